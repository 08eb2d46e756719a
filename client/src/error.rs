// Re-export common error types with client-specific helpers
pub use mmesh_lifecycle_common::{MeshError, Result};

use std::error::Error as StdError;

// tonic's transport error only says "transport error"; the cause is in the chain
pub fn transport_error_to_mesh_error(target: &str, err: &tonic::transport::Error) -> MeshError {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    MeshError::Connection {
        target: target.to_string(),
        reason,
    }
}
