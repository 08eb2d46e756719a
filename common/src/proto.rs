//! Generated `mmesh` protobuf messages and the `ModelRuntime` gRPC client.
//!
//! Regenerate from `proto/model-runtime.proto` with tonic-build when the
//! contract changes.

#![allow(clippy::derive_partial_eq_without_eq)]

include!("proto/mmesh.rs");
