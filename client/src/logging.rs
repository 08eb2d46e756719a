use clap::ValueEnum;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LifecycleConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// JSON lines with the current span attached
    Json,
}

/// Install the process-wide subscriber.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true);
            tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
            tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        }
    }
}

/// Logging context for one lifecycle run. Every event the run emits is
/// recorded inside this span.
pub fn run_span(run_id: &str, config: &LifecycleConfig) -> Span {
    tracing::info_span!(
        "lifecycle",
        run_id = %run_id,
        runtime = %config.target,
        model_id = %config.model_id(),
    )
}
