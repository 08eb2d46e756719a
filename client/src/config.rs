use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::LogFormat;
use crate::{
    InputValidator, MeshError, ModelKey, ModelSpec, Result, DEFAULT_CALL_TIMEOUT,
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOLD, DEFAULT_TARGET,
};

/// Model driven through the lifecycle when none is configured
pub const DEFAULT_MODEL_ID: &str = "tfmnist";
pub const DEFAULT_MODEL_TYPE: &str = "TensorFlow";
pub const DEFAULT_DISK_SIZE_BYTES: u64 = 54321;

/// Test data directory, relative to the working directory
pub const DEFAULT_TESTDATA_DIR: &str = "server/testdata";

/// Everything one lifecycle run needs.
///
/// `Default` leaves the model path relative; [`LifecycleConfig::try_from`]
/// resolves it against the working directory.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Runtime address, host:port
    pub target: String,
    pub connect_timeout: Duration,
    /// Applied to each RPC on its own
    pub call_timeout: Duration,
    /// Wait between load and unload
    pub hold: Duration,
    /// Model identity plus the key sent with PredictModelSize
    pub model: ModelSpec,
    /// Key sent with LoadModel
    pub load_model_key: ModelKey,
    /// Refuse to load when the predicted size exceeds advertised capacity
    pub enforce_capacity: bool,
    /// Ask the runtime for the loaded model's size before the hold
    pub verify_size: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            hold: DEFAULT_HOLD,
            model: ModelSpec::new(
                DEFAULT_MODEL_ID,
                DEFAULT_MODEL_TYPE,
                relative_model_path(DEFAULT_MODEL_ID).to_string_lossy(),
                ModelKey::with_disk_size(DEFAULT_DISK_SIZE_BYTES),
            ),
            load_model_key: ModelKey::empty(),
            enforce_capacity: false,
            verify_size: false,
        }
    }
}

impl LifecycleConfig {
    pub fn predict_spec(&self) -> &ModelSpec {
        &self.model
    }

    pub fn load_spec(&self) -> ModelSpec {
        self.model.with_model_key(self.load_model_key.clone())
    }

    pub fn model_id(&self) -> &str {
        &self.model.model_id
    }

    /// Reject configurations that could never complete a run
    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(MeshError::Configuration("target address is empty".to_string()));
        }
        if self.connect_timeout.is_zero() {
            return Err(MeshError::Configuration("connect timeout must be non-zero".to_string()));
        }
        if self.call_timeout.is_zero() {
            return Err(MeshError::Configuration("call timeout must be non-zero".to_string()));
        }

        let validator = InputValidator::new();
        validator.validate_model_spec(self.predict_spec())?;
        validator.validate_model_spec(&self.load_spec())?;
        Ok(())
    }
}

/// `server/testdata/<model_id>`, not yet resolved against any directory
pub fn relative_model_path(model_id: &str) -> PathBuf {
    Path::new(DEFAULT_TESTDATA_DIR).join(model_id)
}

/// `<cwd>/server/testdata/<model_id>`, made absolute
pub fn default_model_path(model_id: &str) -> Result<PathBuf> {
    model_path_under(std::env::current_dir(), model_id)
}

fn model_path_under(base: io::Result<PathBuf>, model_id: &str) -> Result<PathBuf> {
    let base = base.map_err(|e| {
        MeshError::Configuration(format!(
            "cannot resolve the default model path, pass --model-path: working directory unavailable: {}",
            e
        ))
    })?;
    Ok(base.join(relative_model_path(model_id)))
}

#[derive(Parser, Debug)]
#[command(name = "mmesh-lifecycle")]
#[command(about = "Drive a model through a model runtime's load/unload lifecycle")]
#[command(version)]
pub struct CliArgs {
    /// Runtime address (host:port)
    #[arg(long, env = "MMESH_TARGET", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Connection timeout in milliseconds
    #[arg(long, env = "MMESH_CONNECT_TIMEOUT_MS", default_value_t = 2_000)]
    pub connect_timeout_ms: u64,

    /// Per-call timeout in milliseconds
    #[arg(long, env = "MMESH_CALL_TIMEOUT_MS", default_value_t = 15_000)]
    pub call_timeout_ms: u64,

    /// Seconds to keep the model loaded before unloading it
    #[arg(long, env = "MMESH_HOLD_SECS", default_value_t = 30)]
    pub hold_secs: u64,

    #[arg(long, default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// Runtime backend name
    #[arg(long, default_value = DEFAULT_MODEL_TYPE)]
    pub model_type: String,

    /// Model location as seen by the server [default: <cwd>/server/testdata/<model-id>]
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// JSON model key sent with PredictModelSize
    #[arg(long, default_value = r#"{"disk_size_bytes": 54321}"#)]
    pub predict_model_key: String,

    /// JSON model key sent with LoadModel
    #[arg(long, default_value = "{}")]
    pub load_model_key: String,

    /// Abort before loading if the predicted size exceeds runtime capacity
    #[arg(long)]
    pub enforce_capacity: bool,

    /// Query the loaded model's size after LoadModel
    #[arg(long)]
    pub verify_size: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl TryFrom<&CliArgs> for LifecycleConfig {
    type Error = MeshError;

    fn try_from(args: &CliArgs) -> Result<Self> {
        let model_path = match &args.model_path {
            Some(path) => path.clone(),
            None => default_model_path(&args.model_id)?,
        };

        let predict_key = ModelKey::parse(&args.predict_model_key).map_err(|e| {
            MeshError::Configuration(format!("--predict-model-key: {}", e))
        })?;
        let load_model_key = ModelKey::parse(&args.load_model_key).map_err(|e| {
            MeshError::Configuration(format!("--load-model-key: {}", e))
        })?;

        Ok(Self {
            target: args.target.clone(),
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
            call_timeout: Duration::from_millis(args.call_timeout_ms),
            hold: Duration::from_secs(args.hold_secs),
            model: ModelSpec::new(
                args.model_id.clone(),
                args.model_type.clone(),
                model_path.to_string_lossy(),
                predict_key,
            ),
            load_model_key,
            enforce_capacity: args.enforce_capacity,
            verify_size: args.verify_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_verification_scenario() {
        let config = LifecycleConfig::default();
        assert_eq!(config.target, "localhost:8085");
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.call_timeout, Duration::from_secs(15));
        assert_eq!(config.hold, Duration::from_secs(30));
        assert_eq!(config.model_id(), "tfmnist");
        assert_eq!(config.predict_spec().model_key.encode(), r#"{"disk_size_bytes": 54321}"#);
        assert_eq!(config.load_spec().model_key.encode(), "{}");
        assert_eq!(config.model.model_path, "server/testdata/tfmnist");
    }

    #[test]
    fn test_default_args_resolve_model_path() {
        let args = CliArgs::try_parse_from(["mmesh-lifecycle"]).unwrap();
        let config = LifecycleConfig::try_from(&args).unwrap();

        assert!(Path::new(&config.model.model_path).is_absolute());
        assert!(config.model.model_path.ends_with("server/testdata/tfmnist"));
        assert_eq!(config.predict_spec().model_key.encode(), r#"{"disk_size_bytes": 54321}"#);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_working_directory_is_a_configuration_error() {
        let gone = io::Error::new(io::ErrorKind::NotFound, "deleted");
        assert!(matches!(
            model_path_under(Err(gone), "tfmnist"),
            Err(MeshError::Configuration(msg)) if msg.contains("--model-path")
        ));

        let resolved = model_path_under(Ok(PathBuf::from("/work")), "tfmnist").unwrap();
        assert_eq!(resolved, PathBuf::from("/work/server/testdata/tfmnist"));
    }

    #[test]
    fn test_cli_args_into_config() {
        let args = CliArgs::try_parse_from([
            "mmesh-lifecycle",
            "--target",
            "runtime:9000",
            "--hold-secs",
            "0",
            "--model-id",
            "sklearn-mnist",
            "--model-type",
            "sklearn",
            "--model-path",
            "/models/mnist",
            "--load-model-key",
            r#"{"storage_key":"local"}"#,
            "--enforce-capacity",
        ])
        .unwrap();

        let config = LifecycleConfig::try_from(&args).unwrap();
        assert_eq!(config.target, "runtime:9000");
        assert!(config.hold.is_zero());
        assert_eq!(config.model.model_path, "/models/mnist");
        assert_eq!(config.predict_spec().model_key.disk_size_bytes(), Some(54321));
        assert_eq!(config.load_spec().model_id, "sklearn-mnist");
        assert_eq!(config.load_spec().model_key.encode(), r#"{"storage_key":"local"}"#);
        assert!(config.enforce_capacity);
        assert!(!config.verify_size);
    }

    #[test]
    fn test_bad_model_key_is_a_configuration_error() {
        let args = CliArgs::try_parse_from(["mmesh-lifecycle", "--predict-model-key", "[1]"]).unwrap();
        assert!(matches!(
            LifecycleConfig::try_from(&args),
            Err(MeshError::Configuration(msg)) if msg.contains("--predict-model-key")
        ));
    }

    #[test]
    fn test_validation_rejects_unusable_config() {
        let mut config = LifecycleConfig::default();
        config.call_timeout = Duration::ZERO;
        assert!(matches!(config.validate(), Err(MeshError::Configuration(_))));

        let mut config = LifecycleConfig::default();
        config.model.model_path = "relative/tfmnist".to_string();
        assert!(matches!(config.validate(), Err(MeshError::Validation(_))));

        let mut config = LifecycleConfig::default();
        config.model.model_path = "/srv/tfmnist".to_string();
        config.model.model_id = String::new();
        assert!(matches!(config.validate(), Err(MeshError::Validation(_))));
    }
}
