use crate::resource::ResourceKind;
use std::path::PathBuf;

/// Unknown or unsupported billing resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("unsupported billing resource type: {0}")]
    UnsupportedResource(String),
}

/// Sync configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read sync config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sync config: {0}")]
    Parse(String),

    #[error("sync rule has an empty collection slug")]
    EmptyCollection,

    #[error("collection '{0}' has more than one sync rule")]
    DuplicateCollection(String),

    #[error("collection '{collection}' maps more than one field to property '{property}'")]
    DuplicateProperty { collection: String, property: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// A remote create did not produce a resource.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("billing API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        kind: Option<String>,
        code: Option<String>,
    },

    #[error("billing API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed billing API response: {0}")]
    MalformedResponse(String),

    #[error("client does not support creating '{0}'")]
    UnsupportedResource(ResourceKind),
}
