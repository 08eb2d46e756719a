use std::future::Future;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info};

use crate::error::transport_error_to_mesh_error;
use crate::protocol;
use crate::{
    LoadModelResponse, MeshError, ModelRuntimeClient, ModelSizeResponse, ModelSpec, Operation,
    PredictModelSizeResponse, Result, RuntimeStatusResponse, UnloadModelResponse,
};

/// Lifecycle operations of a remote model runtime.
///
/// Implementations own their connection; dropping the runtime releases it.
/// Callers drive one runtime from a single task, so the futures carry no
/// `Send` bound.
#[allow(async_fn_in_trait)]
pub trait ModelRuntime {
    /// Liveness and capability probe
    async fn runtime_status(&mut self) -> Result<RuntimeStatusResponse>;

    /// Ask the runtime how much capacity the model would take once loaded
    async fn predict_model_size(&mut self, spec: &ModelSpec) -> Result<PredictModelSizeResponse>;

    async fn load_model(&mut self, spec: &ModelSpec) -> Result<LoadModelResponse>;

    /// Size of an already loaded model
    async fn model_size(&mut self, model_id: &str) -> Result<ModelSizeResponse>;

    async fn unload_model(&mut self, model_id: &str) -> Result<UnloadModelResponse>;
}

/// Await one call under its own timeout.
///
/// A call that outlives `timeout` is reported the same way as a remote
/// `DEADLINE_EXCEEDED`; nothing carries over to the next call.
pub async fn call_with_timeout<T, F>(operation: Operation, timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<tonic::Response<T>, tonic::Status>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(response)) => Ok(response.into_inner()),
        Ok(Err(status)) => Err(MeshError::from_status(operation, &status)),
        Err(_) => Err(MeshError::deadline_exceeded(operation, timeout)),
    }
}

/// `ModelRuntime` over a plaintext gRPC channel
pub struct GrpcModelRuntime {
    client: ModelRuntimeClient<Channel>,
    target: String,
    call_timeout: Duration,
}

impl GrpcModelRuntime {
    /// Dial `target` and block until connected or `connect_timeout` elapses.
    pub async fn connect(target: &str, connect_timeout: Duration, call_timeout: Duration) -> Result<Self> {
        let uri = if target.contains("://") {
            target.to_string()
        } else {
            format!("http://{}", target)
        };

        let endpoint = Endpoint::from_shared(uri)
            .map_err(|e| transport_error_to_mesh_error(target, &e))?
            .connect_timeout(connect_timeout);

        debug!(event = "connect", target = %target, timeout_ms = connect_timeout.as_millis() as u64, "dialing runtime");

        let channel = match tokio::time::timeout(connect_timeout, endpoint.connect()).await {
            Ok(Ok(channel)) => channel,
            Ok(Err(e)) => return Err(transport_error_to_mesh_error(target, &e)),
            Err(_) => {
                return Err(MeshError::Connection {
                    target: target.to_string(),
                    reason: format!("timed out after {}ms", connect_timeout.as_millis()),
                })
            }
        };

        info!(event = "connected", target = %target, "connected to runtime");

        Ok(Self {
            client: ModelRuntimeClient::new(channel),
            target: target.to_string(),
            call_timeout,
        })
    }

    fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        // Propagate the deadline so the server can give up too
        request.set_timeout(self.call_timeout);
        request
    }
}

impl ModelRuntime for GrpcModelRuntime {
    async fn runtime_status(&mut self) -> Result<RuntimeStatusResponse> {
        let request = self.request(protocol::runtime_status_request());
        call_with_timeout(
            Operation::RuntimeStatus,
            self.call_timeout,
            self.client.runtime_status(request),
        )
        .await
    }

    async fn predict_model_size(&mut self, spec: &ModelSpec) -> Result<PredictModelSizeResponse> {
        let request = self.request(protocol::predict_model_size_request(spec));
        call_with_timeout(
            Operation::PredictModelSize,
            self.call_timeout,
            self.client.predict_model_size(request),
        )
        .await
    }

    async fn load_model(&mut self, spec: &ModelSpec) -> Result<LoadModelResponse> {
        let request = self.request(protocol::load_model_request(spec));
        call_with_timeout(Operation::LoadModel, self.call_timeout, self.client.load_model(request)).await
    }

    async fn model_size(&mut self, model_id: &str) -> Result<ModelSizeResponse> {
        let request = self.request(protocol::model_size_request(model_id));
        call_with_timeout(Operation::ModelSize, self.call_timeout, self.client.model_size(request)).await
    }

    async fn unload_model(&mut self, model_id: &str) -> Result<UnloadModelResponse> {
        let request = self.request(protocol::unload_model_request(model_id));
        call_with_timeout(
            Operation::UnloadModel,
            self.call_timeout,
            self.client.unload_model(request),
        )
        .await
    }
}

impl Drop for GrpcModelRuntime {
    fn drop(&mut self) {
        debug!(event = "disconnect", target = %self.target, "connection released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn timeout_maps_to_deadline_exceeded() {
        let hang = std::future::pending::<std::result::Result<tonic::Response<()>, tonic::Status>>();
        let err = call_with_timeout(Operation::LoadModel, Duration::from_secs(15), hang)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.operation(), Some(Operation::LoadModel));
    }

    #[tokio::test]
    async fn remote_status_is_preserved() {
        let failing = async { Err::<tonic::Response<()>, _>(tonic::Status::resource_exhausted("no room")) };
        let err = call_with_timeout(Operation::LoadModel, Duration::from_secs(1), failing)
            .await
            .unwrap_err();
        match err {
            MeshError::Rpc { operation, code, message } => {
                assert_eq!(operation, Operation::LoadModel);
                assert_eq!(code, tonic::Code::ResourceExhausted);
                assert_eq!(message, "no room");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_target_is_a_connection_error() {
        let err = GrpcModelRuntime::connect("bad host:80", Duration::from_millis(200), Duration::from_secs(1))
            .await
            .err()
            .expect("connect should fail");
        assert!(matches!(err, MeshError::Connection { .. }));
    }
}
