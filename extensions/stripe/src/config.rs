//! Sync rules: which collections create which Stripe resources, and with
//! which fields.
//!
//! ```toml
//! [[sync]]
//! collection = "customers"
//! resource = "customers"
//! fields = [
//!     { field = "name", property = "name" },
//!     { field = "email", property = "email" },
//! ]
//! ```

use crate::error::ConfigError;
use crate::resource::ResourceKind;
use paysync_core::record::PendingRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// One local field and the Stripe property it is sent as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field name on the local record
    pub field: String,
    /// Property name in the Stripe create payload
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRule {
    pub collection: String,
    pub resource: ResourceKind,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

impl SyncRule {
    pub fn new(collection: impl Into<String>, resource: ResourceKind) -> Self {
        Self {
            collection: collection.into(),
            resource,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: impl Into<String>, property: impl Into<String>) -> Self {
        self.fields.push(FieldMapping {
            field: field.into(),
            property: property.into(),
        });
        self
    }

    /// Build the create payload for `record`.
    ///
    /// Only mapped fields are read, keyed by their Stripe property name.
    /// Fields that are missing or null on the record are left out.
    pub fn project(&self, record: &PendingRecord) -> Map<String, Value> {
        let mut params = Map::new();
        for mapping in &self.fields {
            match record.get(&mapping.field) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    params.insert(mapping.property.clone(), value.clone());
                }
            }
        }
        params
    }
}

/// The full set of sync rules. Loaded once at startup and shared read-only.
///
/// Only built through `new` or the loaders, so every instance has passed
/// `validate`:
///
/// ```compile_fail
/// use paysync_stripe::SyncConfig;
///
/// let config = SyncConfig { sync: Vec::new() };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    sync: Vec<SyncRule>,
}

impl SyncConfig {
    pub fn new(rules: Vec<SyncRule>) -> Result<Self, ConfigError> {
        let config = Self { sync: rules };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        let config: SyncConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML rules file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(
            path = %path.display(),
            rules = config.sync.len(),
            "loaded billing sync config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut collections = HashSet::new();
        for rule in &self.sync {
            if rule.collection.trim().is_empty() {
                return Err(ConfigError::EmptyCollection);
            }
            if !collections.insert(rule.collection.as_str()) {
                return Err(ConfigError::DuplicateCollection(rule.collection.clone()));
            }

            let mut properties = HashSet::new();
            for mapping in &rule.fields {
                if !properties.insert(mapping.property.as_str()) {
                    return Err(ConfigError::DuplicateProperty {
                        collection: rule.collection.clone(),
                        property: mapping.property.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn rule_for(&self, collection: &str) -> Option<&SyncRule> {
        self.sync.iter().find(|rule| rule.collection == collection)
    }

    pub fn rules(&self) -> &[SyncRule] {
        &self.sync
    }

    pub fn is_empty(&self) -> bool {
        self.sync.is_empty()
    }
}
