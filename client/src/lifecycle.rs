//! Model lifecycle driver
//!
//! Runs one model through a runtime as a fixed pipeline of stages:
//!
//! `RuntimeStatus -> PredictModelSize -> [Admission] -> LoadModel -> [ModelSize] -> Hold -> UnloadModel`
//!
//! Each stage yields a `Result`; the first error stops the pipeline and is
//! returned to the caller, which maps it to the process exit status. Nothing is
//! retried and a failed load is never followed by an unload.

use std::fmt;
use std::future::Future;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument, Span};

use crate::config::LifecycleConfig;
use crate::protocol;
use crate::runtime::ModelRuntime;
use crate::{
    LoadModelResponse, MeshError, ModelSizeResponse, PredictModelSizeResponse, Result,
    RuntimeState, RuntimeStatusResponse, UnloadModelResponse,
};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RuntimeStatus,
    PredictModelSize,
    Admission,
    LoadModel,
    ModelSize,
    Hold,
    UnloadModel,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Responses collected by a completed run
#[derive(Debug, Clone)]
pub struct LifecycleReport {
    pub status: RuntimeStatusResponse,
    pub predicted_size: PredictModelSizeResponse,
    pub loaded: LoadModelResponse,
    /// Present when the post-load size check ran
    pub loaded_size: Option<ModelSizeResponse>,
    pub unloaded: UnloadModelResponse,
    /// False when the hold was cut short by cancellation
    pub hold_completed: bool,
}

/// Drives a model through one runtime. Owns the runtime, so its connection is
/// released exactly once when [`ModelLifecycle::run`] returns.
pub struct ModelLifecycle<R: ModelRuntime> {
    runtime: R,
    config: LifecycleConfig,
    span: Span,
    cancel: CancellationToken,
}

impl<R: ModelRuntime> ModelLifecycle<R> {
    pub fn new(runtime: R, config: LifecycleConfig, span: Span) -> Self {
        Self {
            runtime,
            config,
            span,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token to cut the hold short
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run every stage in order, stopping at the first failure.
    pub async fn run(self) -> Result<LifecycleReport> {
        let span = self.span.clone();
        async move {
            let mut this = self;
            // Failures were already logged by the stage that hit them
            let result = this.stages().await;
            if let Ok(report) = &result {
                info!(
                    event = "lifecycle_complete",
                    hold_completed = report.hold_completed,
                    "model lifecycle completed"
                );
            }
            result
            // `this` drops here, releasing the runtime connection
        }
        .instrument(span)
        .await
    }

    async fn stages(&mut self) -> Result<LifecycleReport> {
        let status = self.runtime.runtime_status().await.map_err(|e| failed(Stage::RuntimeStatus, e))?;
        info!(event = "rpc_ok", operation = "RuntimeStatus", response = ?status, "runtime status");
        if protocol::runtime_state(&status) != Some(RuntimeState::Ready) {
            warn!(event = "runtime_not_ready", state = status.status, "runtime does not report READY");
        }

        let predict_spec = self.config.predict_spec().clone();
        let predicted_size = self
            .runtime
            .predict_model_size(&predict_spec)
            .await
            .map_err(|e| failed(Stage::PredictModelSize, e))?;
        info!(event = "rpc_ok", operation = "PredictModelSize", response = ?predicted_size, "predict model size");

        self.admit(&status, &predicted_size).map_err(|e| failed(Stage::Admission, e))?;

        let load_spec = self.config.load_spec();
        let loaded = self
            .runtime
            .load_model(&load_spec)
            .await
            .map_err(|e| failed(Stage::LoadModel, e))?;
        info!(event = "rpc_ok", operation = "LoadModel", response = ?loaded, "model loaded");

        let loaded_size = if self.config.verify_size {
            let size = self
                .runtime
                .model_size(&load_spec.model_id)
                .await
                .map_err(|e| failed(Stage::ModelSize, e))?;
            info!(event = "rpc_ok", operation = "ModelSize", response = ?size, "loaded model size");
            Some(size)
        } else {
            None
        };

        let hold_completed = self.hold().await;

        let unloaded = self
            .runtime
            .unload_model(&load_spec.model_id)
            .await
            .map_err(|e| failed(Stage::UnloadModel, e))?;
        info!(event = "rpc_ok", operation = "UnloadModel", response = ?unloaded, "model unloaded");

        Ok(LifecycleReport {
            status,
            predicted_size,
            loaded,
            loaded_size,
            unloaded,
            hold_completed,
        })
    }

    /// Optional capacity gate between size prediction and load
    fn admit(&self, status: &RuntimeStatusResponse, predicted: &PredictModelSizeResponse) -> Result<()> {
        if !self.config.enforce_capacity {
            return Ok(());
        }

        match protocol::advertised_capacity(status) {
            Some(capacity) if predicted.size_in_bytes > capacity => Err(MeshError::InsufficientCapacity {
                model_id: self.config.model_id().to_string(),
                predicted: predicted.size_in_bytes,
                capacity,
            }),
            Some(capacity) => {
                debug!(event = "admitted", predicted = predicted.size_in_bytes, capacity, "model fits");
                Ok(())
            }
            None => {
                debug!(event = "admission_skipped", "runtime advertises no capacity");
                Ok(())
            }
        }
    }

    /// Keep the model loaded for the configured time. Returns false when
    /// cancelled early; the caller still unloads.
    async fn hold(&self) -> bool {
        let hold = self.config.hold;
        if hold.is_zero() {
            return true;
        }

        info!(event = "hold", hold_secs = hold.as_secs_f64(), "holding model before unload");
        tokio::select! {
            _ = tokio::time::sleep(hold) => true,
            _ = self.cancel.cancelled() => {
                warn!(event = "hold_cancelled", "hold cancelled, unloading now");
                false
            }
        }
    }
}

/// Forward interrupts to a run's cancellation token.
///
/// The first interrupt cancels `cancel`, ending the hold so the model is
/// unloaded. The next one resolves to `true`: the caller should exit without
/// waiting any longer. Resolves to `false` if interrupts cannot be received.
pub async fn cancel_on_interrupt<F, Fut>(cancel: CancellationToken, mut next_interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    loop {
        if let Err(e) = next_interrupt().await {
            warn!(event = "interrupt_unavailable", error = %e, "cannot listen for interrupts");
            return false;
        }

        if cancel.is_cancelled() {
            warn!(event = "interrupt", "interrupted again, exiting without unload");
            return true;
        }

        warn!(event = "interrupt", "interrupt received, unloading now");
        cancel.cancel();
    }
}

fn failed(stage: Stage, err: MeshError) -> MeshError {
    error!(event = "stage_failed", stage = %stage, error = %err, "lifecycle stage failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[test]
    fn stage_names() {
        assert_eq!(Stage::PredictModelSize.to_string(), "PredictModelSize");
        assert_eq!(Stage::Hold.to_string(), "Hold");
    }

    type Interrupt = Pin<Box<dyn Future<Output = io::Result<()>> + Send>>;

    fn interrupts(source: &Arc<Notify>) -> impl FnMut() -> Interrupt {
        let source = source.clone();
        move || -> Interrupt {
            let source = source.clone();
            Box::pin(async move {
                source.notified().await;
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn first_interrupt_cancels_second_forces_exit() {
        let source = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(cancel_on_interrupt(cancel.clone(), interrupts(&source)));

        source.notify_one();
        cancel.cancelled().await;
        assert!(!watcher.is_finished(), "one interrupt only ends the hold");

        source.notify_one();
        assert!(watcher.await.unwrap());
    }

    #[tokio::test]
    async fn interrupt_after_cancellation_forces_exit() {
        let source = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let forced = cancel_on_interrupt(cancel, interrupts(&source));
        source.notify_one();
        assert!(forced.await);
    }

    #[tokio::test]
    async fn unavailable_signal_source_stops_watching() {
        let cancel = CancellationToken::new();
        let forced = cancel_on_interrupt(cancel.clone(), || async {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no signal handler"))
        })
        .await;

        assert!(!forced);
        assert!(!cancel.is_cancelled());
    }
}
