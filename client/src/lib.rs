pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod runtime;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export common types and client-specific types
pub use mmesh_lifecycle_common::*;
pub use config::{CliArgs, LifecycleConfig};
pub use error::{MeshError, Result};
pub use lifecycle::{cancel_on_interrupt, LifecycleReport, ModelLifecycle, Stage};
pub use runtime::{GrpcModelRuntime, ModelRuntime};
