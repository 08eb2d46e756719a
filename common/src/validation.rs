use std::path::Path;
use thiserror::Error;

use crate::types::ModelSpec;

/// Limits applied to lifecycle requests before they leave the client
#[derive(Debug, Clone)]
pub struct ValidationLimits {
    /// Maximum model_id length (256 bytes)
    pub max_model_id_length: usize,
    /// Maximum encoded model key size (64KB)
    pub max_model_key_size: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_model_id_length: 256,
            max_model_key_size: 64 * 1024,
        }
    }
}

/// Validation errors for input validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Model ID length {length} exceeds maximum {max}")]
    ModelIdTooLong { length: usize, max: usize },

    #[error("Invalid model ID: {reason}")]
    InvalidModelId { reason: String },

    #[error("Invalid model type: {reason}")]
    InvalidModelType { reason: String },

    #[error("Model path must be absolute: {path}")]
    RelativeModelPath { path: String },

    #[error("Model key size {size} exceeds maximum {max}")]
    ModelKeyTooLarge { size: usize, max: usize },

    #[error("Invalid model key: {0}")]
    InvalidModelKey(String),
}

/// Input validator for lifecycle requests
pub struct InputValidator {
    limits: ValidationLimits,
}

impl InputValidator {
    /// Create a new input validator with default limits
    pub fn new() -> Self {
        Self {
            limits: ValidationLimits::default(),
        }
    }

    /// Create a new input validator with custom limits
    pub fn with_limits(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Validate model ID
    pub fn validate_model_id(&self, model_id: &str) -> Result<(), ValidationError> {
        if model_id.trim().is_empty() {
            return Err(ValidationError::InvalidModelId {
                reason: "Model ID cannot be empty".to_string(),
            });
        }

        if model_id.len() > self.limits.max_model_id_length {
            return Err(ValidationError::ModelIdTooLong {
                length: model_id.len(),
                max: self.limits.max_model_id_length,
            });
        }

        // Runtimes embed ids in paths and vmodel names; keep to a safe alphabet
        if !model_id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        {
            return Err(ValidationError::InvalidModelId {
                reason: "Model ID contains invalid characters".to_string(),
            });
        }

        Ok(())
    }

    /// Validate the runtime backend name
    pub fn validate_model_type(&self, model_type: &str) -> Result<(), ValidationError> {
        if model_type.trim().is_empty() {
            return Err(ValidationError::InvalidModelType {
                reason: "Model type cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The path is resolved by the server, so only an absolute path is meaningful.
    pub fn validate_model_path(&self, model_path: &str) -> Result<(), ValidationError> {
        if !Path::new(model_path).is_absolute() {
            return Err(ValidationError::RelativeModelPath {
                path: model_path.to_string(),
            });
        }
        Ok(())
    }

    /// Validate an encoded model key: a JSON object within the size limit
    pub fn validate_model_key(&self, encoded: &str) -> Result<(), ValidationError> {
        if encoded.len() > self.limits.max_model_key_size {
            return Err(ValidationError::ModelKeyTooLarge {
                size: encoded.len(),
                max: self.limits.max_model_key_size,
            });
        }

        match serde_json::from_str::<serde_json::Value>(encoded) {
            Ok(serde_json::Value::Object(_)) => Ok(()),
            Ok(_) => Err(ValidationError::InvalidModelKey(
                "Model key must be a JSON object".to_string(),
            )),
            Err(e) => Err(ValidationError::InvalidModelKey(e.to_string())),
        }
    }

    /// Validate everything a predict/load request is built from
    pub fn validate_model_spec(&self, spec: &ModelSpec) -> Result<(), ValidationError> {
        self.validate_model_id(&spec.model_id)?;
        self.validate_model_type(&spec.model_type)?;
        self.validate_model_path(&spec.model_path)?;
        self.validate_model_key(&spec.model_key.encode())?;
        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}
