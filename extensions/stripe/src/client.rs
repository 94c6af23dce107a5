//! Billing provider clients.
//!
//! `BillingClient` is the seam the sync hook calls through; `StripeClient`
//! is the production implementation. Tests substitute their own double.

use crate::error::BillingError;
use crate::form;
use crate::resource::ResourceKind;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

pub const SECRET_KEY_VAR: &str = "STRIPE_SECRET_KEY";
pub const API_BASE_VAR: &str = "STRIPE_API_BASE";
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
/// Stripe API version pinned on every request.
pub const API_VERSION: &str = "2022-08-01";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A resource the provider created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedResource {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
}

#[async_trait]
pub trait BillingClient: Send + Sync + 'static {
    /// Create one resource of `kind` from `params`.
    async fn create(
        &self,
        kind: ResourceKind,
        params: Map<String, Value>,
    ) -> Result<CreatedResource, BillingError>;
}

#[derive(Clone)]
pub struct StripeSettings {
    pub secret_key: String,
    pub api_base: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl StripeSettings {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    /// Read settings from `STRIPE_SECRET_KEY` and `STRIPE_API_BASE`.
    ///
    /// A missing key is not an error here: requests will be rejected by
    /// Stripe instead, and the hook logs those failures.
    pub fn from_env() -> Self {
        let secret_key = std::env::var(SECRET_KEY_VAR).unwrap_or_default();
        if secret_key.is_empty() {
            tracing::warn!(
                "{} is not set; billing sync requests will be rejected",
                SECRET_KEY_VAR
            );
        }
        Self {
            secret_key,
            api_base: api_base_or_default(std::env::var(API_BASE_VAR).ok()),
            ..Self::default()
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for StripeSettings {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for StripeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeSettings")
            .field("secret_key", &if self.secret_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Blank overrides fall back to the public API.
fn api_base_or_default(value: Option<String>) -> String {
    value
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Turn a non-2xx response body into `BillingError::Api`.
pub(crate) fn decode_error(status: u16, body: &[u8]) -> BillingError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => BillingError::Api {
            status,
            message: envelope.error.message.unwrap_or_default(),
            kind: envelope.error.kind,
            code: envelope.error.code,
        },
        Err(_) => BillingError::Api {
            status,
            message: String::from_utf8_lossy(body).trim().to_string(),
            kind: None,
            code: None,
        },
    }
}

/// Stripe REST client. Construct one per process and share it.
#[derive(Clone, Debug)]
pub struct StripeClient {
    http: reqwest::Client,
    settings: StripeSettings,
}

impl StripeClient {
    pub fn new(settings: StripeSettings) -> Result<Self, BillingError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn from_env() -> Result<Self, BillingError> {
        Self::new(StripeSettings::from_env())
    }

    pub fn settings(&self) -> &StripeSettings {
        &self.settings
    }

    fn url_for(&self, kind: ResourceKind) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), kind.path())
    }
}

#[async_trait]
impl BillingClient for StripeClient {
    async fn create(
        &self,
        kind: ResourceKind,
        params: Map<String, Value>,
    ) -> Result<CreatedResource, BillingError> {
        let url = self.url_for(kind);
        let body = form::encode(&params);
        tracing::debug!(resource = %kind, %url, params = body.len(), "POST billing create");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.secret_key)
            .header("Stripe-Version", &self.settings.api_version)
            .form(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &bytes));
        }

        serde_json::from_slice::<CreatedResource>(&bytes)
            .map_err(|e| BillingError::MalformedResponse(e.to_string()))
    }
}
