use thiserror::Error;

use crate::protocol::Operation;

/// Errors that can occur while driving a model through a runtime's lifecycle
#[derive(Error, Debug, Clone)]
pub enum MeshError {
    // Transport errors
    #[error("Failed to connect to runtime at {target}: {reason}")]
    Connection { target: String, reason: String },

    #[error("{operation} failed with {code:?}: {message}")]
    Rpc {
        operation: Operation,
        code: tonic::Code,
        message: String,
    },

    // Admission errors
    #[error("Model {model_id} needs {predicted} bytes but runtime capacity is {capacity} bytes")]
    InsufficientCapacity {
        model_id: String,
        predicted: u64,
        capacity: u64,
    },

    // Input errors
    #[error("Validation error: {0}")]
    Validation(#[from] crate::ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MeshError {
    /// Build an `Rpc` error from the status a remote call returned.
    pub fn from_status(operation: Operation, status: &tonic::Status) -> Self {
        MeshError::Rpc {
            operation,
            code: status.code(),
            message: status.message().to_string(),
        }
    }

    /// An `Rpc` error for a call that outlived its own timeout.
    pub fn deadline_exceeded(operation: Operation, timeout: std::time::Duration) -> Self {
        MeshError::Rpc {
            operation,
            code: tonic::Code::DeadlineExceeded,
            message: format!("no response within {}ms", timeout.as_millis()),
        }
    }

    /// The lifecycle operation that failed, when the error came from one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            MeshError::Rpc { operation, .. } => Some(*operation),
            MeshError::InsufficientCapacity { .. } => Some(Operation::LoadModel),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            MeshError::Rpc {
                code: tonic::Code::DeadlineExceeded,
                ..
            }
        )
    }

    /// Process exit status for a run aborted by this error.
    ///
    /// Every failure is fatal and reported the same way, so all kinds map to 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<serde_json::Error> for MeshError {
    fn from(err: serde_json::Error) -> Self {
        MeshError::Serialization(err.to_string())
    }
}

/// Common result type for the lifecycle tools
pub type Result<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rpc_error_carries_remote_status() {
        let status = tonic::Status::not_found("model tfmnist not found");
        let err = MeshError::from_status(Operation::UnloadModel, &status);

        assert_eq!(err.operation(), Some(Operation::UnloadModel));
        assert!(!err.is_timeout());
        let rendered = err.to_string();
        assert!(rendered.contains("UnloadModel"));
        assert!(rendered.contains("model tfmnist not found"));
    }

    #[test]
    fn test_timeout_is_an_rpc_error() {
        let err = MeshError::deadline_exceeded(Operation::PredictModelSize, Duration::from_secs(15));
        assert!(err.is_timeout());
        assert_eq!(err.operation(), Some(Operation::PredictModelSize));
        assert!(err.to_string().contains("15000ms"));
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = vec![
            MeshError::Connection { target: "localhost:8085".into(), reason: "refused".into() },
            MeshError::deadline_exceeded(Operation::RuntimeStatus, Duration::from_secs(1)),
            MeshError::Configuration("bad".into()),
            MeshError::InsufficientCapacity { model_id: "m".into(), predicted: 2, capacity: 1 },
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{err} must not exit 0");
        }
    }

    #[test]
    fn test_connection_error_has_no_operation() {
        let err = MeshError::Connection { target: "localhost:1".into(), reason: "timed out".into() };
        assert_eq!(err.operation(), None);
    }
}
