//! Common types and utilities for the mmesh model lifecycle tools
//!
//! This crate provides the `mmesh.ModelRuntime` wire contract, the shared error
//! taxonomy, model metadata types and input validation used by the client.

pub mod error;
pub mod proto;
pub mod protocol;
pub mod types;
pub mod validation;

// Re-export commonly used types and errors
pub use error::{MeshError, Result};

pub use proto::model_runtime_client::ModelRuntimeClient;
pub use proto::runtime_status_response::Status as RuntimeState;
pub use proto::{
    LoadModelRequest, LoadModelResponse, ModelSizeRequest, ModelSizeResponse,
    PredictModelSizeRequest, PredictModelSizeResponse, RuntimeStatusRequest,
    RuntimeStatusResponse, UnloadModelRequest, UnloadModelResponse,
};

pub use protocol::{
    Operation, DEFAULT_CALL_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOLD, DEFAULT_TARGET,
    SERVICE_NAME,
};

pub use types::{ModelKey, ModelSpec};

pub use validation::{InputValidator, ValidationError, ValidationLimits};

/// Generate a new UUID v4 string, used to tag one lifecycle run in the logs
pub fn generate_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_contract_values() {
        assert_eq!(DEFAULT_TARGET, "localhost:8085");
        assert_eq!(DEFAULT_CONNECT_TIMEOUT.as_secs(), 2);
        assert_eq!(DEFAULT_CALL_TIMEOUT.as_secs(), 15);
        assert_eq!(DEFAULT_HOLD.as_secs(), 30);
    }
}
