// @generated from proto/model-runtime.proto
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoadModelRequest {
    #[prost(string, tag = "1")]
    pub model_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub model_type: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub model_path: ::prost::alloc::string::String,
    /// JSON-encoded, opaque to callers
    #[prost(string, tag = "4")]
    pub model_key: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct LoadModelResponse {
    #[prost(uint64, tag = "1")]
    pub size_in_bytes: u64,
    #[prost(uint32, tag = "2")]
    pub max_concurrency: u32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnloadModelRequest {
    #[prost(string, tag = "1")]
    pub model_id: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct UnloadModelResponse {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PredictModelSizeRequest {
    #[prost(string, tag = "1")]
    pub model_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub model_type: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub model_path: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub model_key: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PredictModelSizeResponse {
    #[prost(uint64, tag = "1")]
    pub size_in_bytes: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelSizeRequest {
    #[prost(string, tag = "1")]
    pub model_id: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ModelSizeResponse {
    #[prost(uint64, tag = "1")]
    pub size_in_bytes: u64,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct RuntimeStatusRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RuntimeStatusResponse {
    #[prost(enumeration = "runtime_status_response::Status", tag = "1")]
    pub status: i32,
    #[prost(uint64, tag = "2")]
    pub capacity_in_bytes: u64,
    #[prost(uint32, tag = "3")]
    pub max_loading_concurrency: u32,
    #[prost(uint32, tag = "4")]
    pub model_loading_timeout_ms: u32,
    #[prost(uint64, tag = "5")]
    pub default_model_size_in_bytes: u64,
    #[prost(string, tag = "6")]
    pub runtime_version: ::prost::alloc::string::String,
    #[prost(map = "string, message", tag = "8")]
    pub method_infos: ::std::collections::HashMap<
        ::prost::alloc::string::String,
        runtime_status_response::MethodInfo,
    >,
    #[prost(bool, tag = "9")]
    pub allow_any_method: bool,
    #[prost(bool, tag = "10")]
    pub limit_model_concurrency: bool,
}
/// Nested message and enum types in `RuntimeStatusResponse`.
pub mod runtime_status_response {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MethodInfo {
        #[prost(uint32, repeated, tag = "1")]
        pub id_injection_path: ::prost::alloc::vec::Vec<u32>,
    }
    #[derive(
        Clone,
        Copy,
        Debug,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        ::prost::Enumeration
    )]
    #[repr(i32)]
    pub enum Status {
        Starting = 0,
        Ready = 1,
        Failing = 2,
    }
    impl Status {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::Starting => "STARTING",
                Self::Ready => "READY",
                Self::Failing => "FAILING",
            }
        }
        /// Creates an enum from field names used in the ProtoBuf definition.
        pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
            match value {
                "STARTING" => Some(Self::Starting),
                "READY" => Some(Self::Ready),
                "FAILING" => Some(Self::Failing),
                _ => None,
            }
        }
    }
}
/// Generated client implementations.
pub mod model_runtime_client {
    #![allow(
        unused_variables,
        dead_code,
        missing_docs,
        clippy::wildcard_imports,
        clippy::let_unit_value,
    )]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    /// Lifecycle surface exposed by a model-serving runtime to the mesh.
    #[derive(Debug, Clone)]
    pub struct ModelRuntimeClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl ModelRuntimeClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> ModelRuntimeClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        /// Limits the maximum size of a decoded message.
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }
        pub async fn load_model(
            &mut self,
            request: impl tonic::IntoRequest<super::LoadModelRequest>,
        ) -> std::result::Result<
            tonic::Response<super::LoadModelResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/mmesh.ModelRuntime/loadModel",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("mmesh.ModelRuntime", "loadModel"));
            self.inner.unary(req, path, codec).await
        }
        pub async fn unload_model(
            &mut self,
            request: impl tonic::IntoRequest<super::UnloadModelRequest>,
        ) -> std::result::Result<
            tonic::Response<super::UnloadModelResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/mmesh.ModelRuntime/unloadModel",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("mmesh.ModelRuntime", "unloadModel"));
            self.inner.unary(req, path, codec).await
        }
        pub async fn predict_model_size(
            &mut self,
            request: impl tonic::IntoRequest<super::PredictModelSizeRequest>,
        ) -> std::result::Result<
            tonic::Response<super::PredictModelSizeResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/mmesh.ModelRuntime/predictModelSize",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("mmesh.ModelRuntime", "predictModelSize"));
            self.inner.unary(req, path, codec).await
        }
        pub async fn model_size(
            &mut self,
            request: impl tonic::IntoRequest<super::ModelSizeRequest>,
        ) -> std::result::Result<
            tonic::Response<super::ModelSizeResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/mmesh.ModelRuntime/modelSize",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("mmesh.ModelRuntime", "modelSize"));
            self.inner.unary(req, path, codec).await
        }
        pub async fn runtime_status(
            &mut self,
            request: impl tonic::IntoRequest<super::RuntimeStatusRequest>,
        ) -> std::result::Result<
            tonic::Response<super::RuntimeStatusResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/mmesh.ModelRuntime/runtimeStatus",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("mmesh.ModelRuntime", "runtimeStatus"));
            self.inner.unary(req, path, codec).await
        }
    }
}
