//! Pending writes as seen by before-validate hooks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Record attribute holding the billing provider's id for this document.
pub const EXTERNAL_ID_FIELD: &str = "stripeID";

/// Record attribute telling the post-write hook not to sync this write again.
pub const SKIP_SYNC_FIELD: &str = "skipSync";

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("unknown write operation: {0}")]
    UnknownOperation(String),
}

/// The kind of write the host is performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            other => Err(RecordError::UnknownOperation(other.to_string())),
        }
    }
}

/// The in-memory document being written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingRecord(Map<String, Value>);

impl PendingRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The billing provider id, if it is a non-empty string.
    pub fn external_id(&self) -> Option<&str> {
        match self.0.get(EXTERNAL_ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => Some(id.as_str()),
            _ => None,
        }
    }

    /// Whether the record is already linked. Only a missing, `null` or empty
    /// id counts as unlinked; any other value is kept as-is.
    pub fn has_external_id(&self) -> bool {
        match self.0.get(EXTERNAL_ID_FIELD) {
            None | Some(Value::Null) => false,
            Some(Value::String(id)) => !id.is_empty(),
            Some(_) => true,
        }
    }

    pub fn set_external_id(&mut self, id: impl Into<String>) {
        self.0
            .insert(EXTERNAL_ID_FIELD.to_string(), Value::String(id.into()));
    }

    /// Whether the suppression flag is set. Anything but `true` reads as unset.
    pub fn skip_sync(&self) -> bool {
        matches!(self.0.get(SKIP_SYNC_FIELD), Some(Value::Bool(true)))
    }

    pub fn set_skip_sync(&mut self, skip: bool) {
        self.0.insert(SKIP_SYNC_FIELD.to_string(), Value::Bool(skip));
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for PendingRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for PendingRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(RecordError::NotAnObject("null")),
            Value::Bool(_) => Err(RecordError::NotAnObject("boolean")),
            Value::Number(_) => Err(RecordError::NotAnObject("number")),
            Value::String(_) => Err(RecordError::NotAnObject("string")),
            Value::Array(_) => Err(RecordError::NotAnObject("array")),
        }
    }
}

/// One write travelling through the before-validate hook chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    /// Slug of the collection the document belongs to
    pub collection: String,
    pub operation: Operation,
    /// Host id of the document, when the host already knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub record: PendingRecord,
}

impl PendingWrite {
    pub fn new(collection: impl Into<String>, operation: Operation, record: PendingRecord) -> Self {
        Self {
            collection: collection.into(),
            operation,
            id: None,
            record,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> PendingRecord {
        PendingRecord::try_from(value).unwrap()
    }

    #[test]
    fn empty_or_null_external_id_reads_as_absent() {
        assert!(!record(json!({})).has_external_id());
        assert!(!record(json!({ "stripeID": "" })).has_external_id());
        assert!(!record(json!({ "stripeID": null })).has_external_id());
        assert_eq!(
            record(json!({ "stripeID": "cus_123" })).external_id(),
            Some("cus_123")
        );
    }

    #[test]
    fn non_string_external_id_still_counts_as_linked() {
        let rec = record(json!({ "stripeID": 12345 }));
        assert!(rec.has_external_id());
        assert_eq!(rec.external_id(), None);
        assert!(record(json!({ "stripeID": false })).has_external_id());
    }

    #[test]
    fn skip_sync_only_true_when_boolean_true() {
        assert!(!record(json!({})).skip_sync());
        assert!(!record(json!({ "skipSync": "yes" })).skip_sync());
        assert!(record(json!({ "skipSync": true })).skip_sync());

        let mut rec = record(json!({ "skipSync": true }));
        rec.set_skip_sync(false);
        assert_eq!(rec.get(SKIP_SYNC_FIELD), Some(&Value::Bool(false)));
    }

    #[test]
    fn rejects_non_object_records() {
        assert_eq!(
            PendingRecord::try_from(json!([1, 2])),
            Err(RecordError::NotAnObject("array"))
        );
        assert_eq!(
            PendingRecord::try_from(Value::Null),
            Err(RecordError::NotAnObject("null"))
        );
    }

    #[test]
    fn operation_round_trips_through_strings() {
        assert_eq!("create".parse::<Operation>(), Ok(Operation::Create));
        assert_eq!(Operation::Update.to_string(), "update");
        assert_eq!(
            "delete".parse::<Operation>(),
            Err(RecordError::UnknownOperation("delete".into()))
        );
        assert_eq!(
            serde_json::to_value(Operation::Create).unwrap(),
            json!("create")
        );
    }

    #[test]
    fn pending_write_deserializes_from_host_payload() {
        let write: PendingWrite = serde_json::from_value(json!({
            "collection": "customers",
            "operation": "update",
            "id": "64f0",
            "record": { "name": "Ada" }
        }))
        .unwrap();

        assert_eq!(write.operation, Operation::Update);
        assert_eq!(write.id.as_deref(), Some("64f0"));
        assert_eq!(write.record.get("name"), Some(&json!("Ada")));
    }
}
