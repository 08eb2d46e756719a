use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::runtime::{call_with_timeout, ModelRuntime};
use crate::{
    LoadModelResponse, ModelSizeResponse, ModelSpec, Operation, PredictModelSizeResponse, Result,
    RuntimeState, RuntimeStatusResponse, UnloadModelResponse, DEFAULT_CALL_TIMEOUT,
};

/// How the mock answers one operation
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply immediately with the configured response
    Respond,
    /// Reply after a delay
    Delay(Duration),
    /// Reply with a remote error status
    Fail(tonic::Code, String),
    /// Never reply
    Hang,
}

/// One call the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub operation: Operation,
    pub model_id: Option<String>,
    /// Encoded model key for predict/load calls
    pub model_key: Option<String>,
}

/// Shared view of a mock runtime that stays usable after the runtime itself
/// has been moved into (and dropped by) a lifecycle run
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    calls: Arc<Mutex<Vec<MockCall>>>,
    released: Arc<AtomicUsize>,
}

impl MockHandle {
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls().into_iter().map(|c| c.operation).collect()
    }

    pub fn was_called(&self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// How many times the mock connection was released
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

/// Scripted in-process runtime for local development and testing
pub struct MockModelRuntime {
    behaviors: HashMap<Operation, MockBehavior>,
    call_timeout: Duration,
    pub status: RuntimeStatusResponse,
    pub predicted_size: u64,
    pub loaded: LoadModelResponse,
    handle: MockHandle,
}

impl MockModelRuntime {
    /// A ready runtime with 1GiB of capacity that answers every call
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            status: RuntimeStatusResponse {
                status: RuntimeState::Ready as i32,
                capacity_in_bytes: 1 << 30,
                max_loading_concurrency: 1,
                model_loading_timeout_ms: 90_000,
                default_model_size_in_bytes: 1_000_000,
                runtime_version: "mock-0.1".to_string(),
                ..Default::default()
            },
            predicted_size: 54_321 * 2,
            loaded: LoadModelResponse {
                size_in_bytes: 54_321 * 2,
                max_concurrency: 1,
            },
            handle: MockHandle::default(),
        }
    }

    pub fn on(mut self, operation: Operation, behavior: MockBehavior) -> Self {
        self.behaviors.insert(operation, behavior);
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_capacity(mut self, capacity_in_bytes: u64) -> Self {
        self.status.capacity_in_bytes = capacity_in_bytes;
        self
    }

    pub fn with_predicted_size(mut self, size_in_bytes: u64) -> Self {
        self.predicted_size = size_in_bytes;
        self
    }

    pub fn handle(&self) -> MockHandle {
        self.handle.clone()
    }

    async fn answer<T>(&self, call: MockCall, response: T) -> Result<T> {
        let operation = call.operation;
        self.handle.record(call);

        let behavior = self
            .behaviors
            .get(&operation)
            .cloned()
            .unwrap_or(MockBehavior::Respond);

        let reply = async move {
            match behavior {
                MockBehavior::Respond => Ok(tonic::Response::new(response)),
                MockBehavior::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(tonic::Response::new(response))
                }
                MockBehavior::Fail(code, message) => Err(tonic::Status::new(code, message)),
                MockBehavior::Hang => std::future::pending().await,
            }
        };

        call_with_timeout(operation, self.call_timeout, reply).await
    }
}

impl Default for MockModelRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRuntime for MockModelRuntime {
    async fn runtime_status(&mut self) -> Result<RuntimeStatusResponse> {
        let call = MockCall {
            operation: Operation::RuntimeStatus,
            model_id: None,
            model_key: None,
        };
        self.answer(call, self.status.clone()).await
    }

    async fn predict_model_size(&mut self, spec: &ModelSpec) -> Result<PredictModelSizeResponse> {
        let call = MockCall {
            operation: Operation::PredictModelSize,
            model_id: Some(spec.model_id.clone()),
            model_key: Some(spec.model_key.encode()),
        };
        let response = PredictModelSizeResponse {
            size_in_bytes: self.predicted_size,
        };
        self.answer(call, response).await
    }

    async fn load_model(&mut self, spec: &ModelSpec) -> Result<LoadModelResponse> {
        let call = MockCall {
            operation: Operation::LoadModel,
            model_id: Some(spec.model_id.clone()),
            model_key: Some(spec.model_key.encode()),
        };
        self.answer(call, self.loaded).await
    }

    async fn model_size(&mut self, model_id: &str) -> Result<ModelSizeResponse> {
        let call = MockCall {
            operation: Operation::ModelSize,
            model_id: Some(model_id.to_string()),
            model_key: None,
        };
        let response = ModelSizeResponse {
            size_in_bytes: self.loaded.size_in_bytes,
        };
        self.answer(call, response).await
    }

    async fn unload_model(&mut self, model_id: &str) -> Result<UnloadModelResponse> {
        let call = MockCall {
            operation: Operation::UnloadModel,
            model_id: Some(model_id.to_string()),
            model_key: None,
        };
        self.answer(call, UnloadModelResponse {}).await
    }
}

impl Drop for MockModelRuntime {
    fn drop(&mut self) {
        self.handle.released.fetch_add(1, Ordering::SeqCst);
    }
}
