//! Model runtime protocol surface
//!
//! Names the lifecycle operations and builds the `mmesh.ModelRuntime` request
//! messages from a [`ModelSpec`], so every request for one model carries the
//! same identity.

use std::fmt;
use std::time::Duration;

use crate::proto::runtime_status_response::Status as RuntimeState;
use crate::proto::{
    LoadModelRequest, ModelSizeRequest, PredictModelSizeRequest, RuntimeStatusRequest,
    RuntimeStatusResponse, UnloadModelRequest,
};
use crate::types::ModelSpec;

/// Fully-qualified gRPC service name
pub const SERVICE_NAME: &str = "mmesh.ModelRuntime";

/// Default runtime address
pub const DEFAULT_TARGET: &str = "localhost:8085";

/// Default time allowed to establish the connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default per-call timeout, applied independently to each RPC
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Default wait between a successful load and the unload
pub const DEFAULT_HOLD: Duration = Duration::from_secs(30);

/// Lifecycle operations exposed by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RuntimeStatus,
    PredictModelSize,
    LoadModel,
    ModelSize,
    UnloadModel,
}

impl Operation {
    /// Method name as it appears in the RPC path
    pub fn method(&self) -> &'static str {
        match self {
            Operation::RuntimeStatus => "runtimeStatus",
            Operation::PredictModelSize => "predictModelSize",
            Operation::LoadModel => "loadModel",
            Operation::ModelSize => "modelSize",
            Operation::UnloadModel => "unloadModel",
        }
    }

    pub fn path(&self) -> String {
        format!("/{}/{}", SERVICE_NAME, self.method())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub fn runtime_status_request() -> RuntimeStatusRequest {
    RuntimeStatusRequest {}
}

pub fn predict_model_size_request(spec: &ModelSpec) -> PredictModelSizeRequest {
    PredictModelSizeRequest {
        model_id: spec.model_id.clone(),
        model_type: spec.model_type.clone(),
        model_path: spec.model_path.clone(),
        model_key: spec.model_key.encode(),
    }
}

pub fn load_model_request(spec: &ModelSpec) -> LoadModelRequest {
    LoadModelRequest {
        model_id: spec.model_id.clone(),
        model_type: spec.model_type.clone(),
        model_path: spec.model_path.clone(),
        model_key: spec.model_key.encode(),
    }
}

pub fn model_size_request(model_id: &str) -> ModelSizeRequest {
    ModelSizeRequest {
        model_id: model_id.to_string(),
    }
}

pub fn unload_model_request(model_id: &str) -> UnloadModelRequest {
    UnloadModelRequest {
        model_id: model_id.to_string(),
    }
}

/// Decoded runtime state; unknown wire values read as `None`
pub fn runtime_state(status: &RuntimeStatusResponse) -> Option<RuntimeState> {
    RuntimeState::try_from(status.status).ok()
}

/// Capacity the runtime advertises, `None` when it does not report one
pub fn advertised_capacity(status: &RuntimeStatusResponse) -> Option<u64> {
    (status.capacity_in_bytes > 0).then_some(status.capacity_in_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelKey;

    #[test]
    fn test_operation_paths() {
        assert_eq!(Operation::RuntimeStatus.path(), "/mmesh.ModelRuntime/runtimeStatus");
        assert_eq!(Operation::UnloadModel.path(), "/mmesh.ModelRuntime/unloadModel");
        assert_eq!(Operation::PredictModelSize.to_string(), "PredictModelSize");
    }

    #[test]
    fn test_requests_share_model_identity() {
        let spec = ModelSpec::new(
            "tfmnist",
            "TensorFlow",
            "/srv/testdata/tfmnist",
            ModelKey::with_disk_size(54321),
        );

        let predict = predict_model_size_request(&spec);
        assert_eq!(predict.model_key, r#"{"disk_size_bytes": 54321}"#);

        let load = load_model_request(&spec.with_model_key(ModelKey::empty()));
        assert_eq!(load.model_key, "{}");
        assert_eq!(load.model_id, predict.model_id);
        assert_eq!(load.model_path, predict.model_path);

        assert_eq!(unload_model_request(&spec.model_id).model_id, "tfmnist");
    }

    #[test]
    fn test_model_key_reaches_request_untouched() {
        let supplied = r#"{"z_tier":"gold", "disk_size_bytes":18446744073709551616}"#;
        let spec = ModelSpec::new("m", "TensorFlow", "/m", ModelKey::parse(supplied).unwrap());
        assert_eq!(predict_model_size_request(&spec).model_key, supplied);
        assert_eq!(load_model_request(&spec).model_key, supplied);
    }

    #[test]
    fn test_runtime_state_decoding() {
        let mut status = RuntimeStatusResponse {
            status: RuntimeState::Ready as i32,
            ..Default::default()
        };
        assert_eq!(runtime_state(&status), Some(RuntimeState::Ready));
        assert_eq!(advertised_capacity(&status), None);

        status.status = 42;
        status.capacity_in_bytes = 1 << 30;
        assert_eq!(runtime_state(&status), None);
        assert_eq!(advertised_capacity(&status), Some(1 << 30));
    }
}
