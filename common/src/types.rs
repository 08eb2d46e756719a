use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{MeshError, Result};

const DISK_SIZE_BYTES: &str = "disk_size_bytes";

/// Opaque model metadata sent alongside predict/load requests.
///
/// The runtime interprets the content; the client only checks that it is a
/// JSON object and sends the text exactly as supplied. `disk_size_bytes` is
/// read out for logging and admission but never written back.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelKey {
    raw: String,
    disk_size_bytes: Option<u64>,
}

impl ModelKey {
    /// The `{}` key used when no metadata hints are needed
    pub fn empty() -> Self {
        Self {
            raw: "{}".to_string(),
            disk_size_bytes: None,
        }
    }

    pub fn with_disk_size(disk_size_bytes: u64) -> Self {
        Self {
            raw: format!(r#"{{"{}": {}}}"#, DISK_SIZE_BYTES, disk_size_bytes),
            disk_size_bytes: Some(disk_size_bytes),
        }
    }

    /// Parse a JSON-encoded key. Anything but a JSON object is rejected.
    pub fn parse(encoded: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(encoded)?;
        let Value::Object(fields) = value else {
            return Err(MeshError::Serialization(format!(
                "model key must be a JSON object, got: {}",
                encoded
            )));
        };

        Ok(Self {
            raw: encoded.to_string(),
            disk_size_bytes: disk_size_hint(&fields),
        })
    }

    /// The key as it goes on the wire, unchanged from what was supplied
    pub fn encode(&self) -> String {
        self.raw.clone()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// On-disk size hint, when present as an unsigned integer
    pub fn disk_size_bytes(&self) -> Option<u64> {
        self.disk_size_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim() == "{}"
    }
}

// Non-numeric or oversized values are left for the server to interpret
fn disk_size_hint(fields: &Map<String, Value>) -> Option<u64> {
    fields.get(DISK_SIZE_BYTES).and_then(Value::as_u64)
}

impl Default for ModelKey {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for ModelKey {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A model as the runtime identifies it
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSpec {
    pub model_id: String,
    /// Runtime backend/framework name, e.g. "TensorFlow"
    pub model_type: String,
    /// Location on the server's filesystem
    pub model_path: String,
    pub model_key: ModelKey,
}

impl ModelSpec {
    pub fn new(
        model_id: impl Into<String>,
        model_type: impl Into<String>,
        model_path: impl Into<String>,
        model_key: ModelKey,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model_type: model_type.into(),
            model_path: model_path.into(),
            model_key,
        }
    }

    /// Same model, different metadata. Keeps the id stable across lifecycle calls.
    pub fn with_model_key(&self, model_key: ModelKey) -> Self {
        Self {
            model_key,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_key_encoding() {
        assert_eq!(ModelKey::empty().encode(), "{}");
        assert_eq!(
            ModelKey::with_disk_size(54321).encode(),
            r#"{"disk_size_bytes": 54321}"#
        );
        assert_eq!(ModelKey::with_disk_size(54321).disk_size_bytes(), Some(54321));
    }

    #[test]
    fn test_model_key_is_sent_verbatim() {
        let supplied = r#"{"n": 123456789012345678901234567890, "b": 1, "a": 2}"#;
        let key = ModelKey::parse(supplied).unwrap();
        assert_eq!(key.encode(), supplied);
        assert_eq!(key.to_string(), supplied);
        assert_eq!(key.disk_size_bytes(), None);
    }

    #[test]
    fn test_model_key_reads_disk_size_without_rewriting() {
        let supplied = "{ \"storage_key\": \"s3\",\n  \"disk_size_bytes\": 54321 }";
        let key = ModelKey::parse(supplied).unwrap();
        assert_eq!(key.disk_size_bytes(), Some(54321));
        assert_eq!(key.as_str(), supplied);
    }

    #[test]
    fn test_model_key_non_numeric_size_stays_opaque() {
        let key = ModelKey::parse(r#"{"disk_size_bytes": "big"}"#).unwrap();
        assert_eq!(key.disk_size_bytes(), None);
        assert_eq!(key.encode(), r#"{"disk_size_bytes": "big"}"#);
    }

    #[test]
    fn test_model_key_rejects_non_objects() {
        assert!(matches!(ModelKey::parse("[]"), Err(MeshError::Serialization(_))));
        assert!(matches!(ModelKey::parse("42"), Err(MeshError::Serialization(_))));
        assert!("{".parse::<ModelKey>().is_err());
        assert!("{}".parse::<ModelKey>().unwrap().is_empty());
    }

    #[test]
    fn test_with_model_key_keeps_identity() {
        let spec = ModelSpec::new("tfmnist", "TensorFlow", "/data/tfmnist", ModelKey::with_disk_size(1));
        let load = spec.with_model_key(ModelKey::empty());
        assert_eq!(load.model_id, spec.model_id);
        assert_eq!(load.model_path, spec.model_path);
        assert!(load.model_key.is_empty());
    }
}
