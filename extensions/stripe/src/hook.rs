//! `SyncOnWrite`: the before-validate hook that creates a Stripe resource
//! for a document and stores the returned id on it.
//!
//! Sync is fire-and-forget. A failed create is logged and the write goes
//! ahead without an id; nothing here can fail the primary write.

use crate::client::{BillingClient, StripeClient};
use crate::config::SyncConfig;
use crate::resource::ResourceKind;
use async_trait::async_trait;
use paysync_core::bus::Bus;
use paysync_core::environment::Environment;
use paysync_core::hook::Hook;
use paysync_core::outcome::Outcome;
use paysync_core::record::{Operation, PendingRecord, PendingWrite};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

/// Id written in place of a real one when running in the test environment.
pub const TEST_EXTERNAL_ID: &str = "test";

/// Long-lived dependencies of the hook.
#[derive(Clone)]
pub struct SyncResources {
    pub config: Arc<SyncConfig>,
    pub client: Arc<dyn BillingClient>,
}

impl SyncResources {
    pub fn new(config: SyncConfig, client: impl BillingClient) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }

    /// Production wiring: rules from a TOML file, Stripe client from the
    /// process environment.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = SyncConfig::load(path)?;
        let client = StripeClient::from_env()?;
        Ok(Self::new(config, client))
    }
}

impl std::fmt::Debug for SyncResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncResources")
            .field("rules", &self.config.rules().len())
            .finish()
    }
}

/// What one invocation is about to send. Lives only for that invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOperation {
    pub collection: String,
    pub operation: Operation,
    pub resource: ResourceKind,
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug)]
pub struct SyncOnWrite {
    resources: SyncResources,
}

impl SyncOnWrite {
    pub fn new(resources: SyncResources) -> Self {
        Self { resources }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.resources.config
    }

    /// Run the hook against one write and return the record to persist.
    pub async fn evaluate(&self, mut write: PendingWrite, env: Environment) -> PendingRecord {
        self.sync(&mut write, env).await;
        write.record
    }

    async fn sync(&self, write: &mut PendingWrite, env: Environment) {
        if env.is_test() {
            tracing::debug!(collection = %write.collection, "test environment; stubbing billing id");
            write.record.set_external_id(TEST_EXTERNAL_ID);
            return;
        }

        // Every write is eligible for the post-write sync unless a create
        // below claims it.
        write.record.set_skip_sync(false);

        // Never true after the reset above. Writes that originate from
        // provider webhooks are expected to set the flag upstream; until that
        // path exists this check stays as is.
        if write.record.skip_sync() {
            tracing::debug!(collection = %write.collection, "write flagged skipSync; bypassing billing sync");
            return;
        }

        let Some(rule) = self.resources.config.rule_for(&write.collection) else {
            tracing::debug!(collection = %write.collection, "no billing sync rule");
            return;
        };

        let op = SyncOperation {
            collection: write.collection.clone(),
            operation: write.operation,
            resource: rule.resource,
            fields: rule.project(&write.record),
        };
        let document_id = write.id.as_deref().unwrap_or("<unsaved>");

        match op.operation {
            Operation::Update => {
                tracing::info!(
                    collection = %op.collection,
                    document_id,
                    "document changed; syncing with billing provider"
                );
                // New documents are created by the post-write hook; here we
                // only backfill documents that never got an id.
                if write.record.has_external_id() {
                    return;
                }
            }
            Operation::Create => {
                tracing::info!(
                    collection = %op.collection,
                    document_id,
                    "document created; syncing with billing provider"
                );
            }
        }

        self.create_remote(op, &mut write.record).await;
    }

    async fn create_remote(&self, op: SyncOperation, record: &mut PendingRecord) {
        tracing::info!(resource = %op.resource, "creating remote resource");

        match self.resources.client.create(op.resource, op.fields).await {
            Ok(created) => {
                tracing::info!(
                    resource = %op.resource,
                    external_id = %created.id,
                    "created remote resource"
                );
                record.set_external_id(created.id);
                // Keeps the post-write hook from creating it a second time.
                record.set_skip_sync(true);
            }
            Err(e) => {
                tracing::error!(
                    collection = %op.collection,
                    operation = %op.operation,
                    resource = %op.resource,
                    error = %e,
                    "failed to create remote resource"
                );
            }
        }
    }
}

#[async_trait]
impl Hook<PendingWrite, PendingWrite> for SyncOnWrite {
    type Error = Infallible;

    async fn run(&self, mut input: PendingWrite, bus: &mut Bus) -> Outcome<PendingWrite, Self::Error> {
        self.sync(&mut input, bus.environment()).await;
        Outcome::next(input)
    }
}
