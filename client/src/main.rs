use anyhow::Context;
use clap::Parser;
use mmesh_lifecycle_client::{
    cancel_on_interrupt, generate_run_id, logging, CliArgs, GrpcModelRuntime, LifecycleConfig,
    LifecycleReport, MeshError, ModelLifecycle,
};
use std::process::ExitCode;
use tracing::{error, info, Instrument};

/// Exit status after a second interrupt, as a shell reports SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.log_format);

    match run(&args).await {
        Ok(report) => {
            info!(event = "exit", hold_completed = report.hold_completed, "lifecycle verification passed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let mesh_error = e.downcast_ref::<MeshError>();
            let code = mesh_error.map(MeshError::exit_code).unwrap_or(1);
            // Stage failures are logged by the lifecycle; only setup errors are new here
            if mesh_error.and_then(MeshError::operation).is_none() {
                error!(event = "setup_failed", error = %format!("{:#}", e), "lifecycle could not start");
            }
            info!(event = "exit", code, "lifecycle verification failed");
            ExitCode::from(code)
        }
    }
}

async fn run(args: &CliArgs) -> anyhow::Result<LifecycleReport> {
    let config = LifecycleConfig::try_from(args).context("invalid arguments")?;
    config.validate().context("invalid configuration")?;

    let span = logging::run_span(&generate_run_id(), &config);

    let runtime = GrpcModelRuntime::connect(&config.target, config.connect_timeout, config.call_timeout)
        .instrument(span.clone())
        .await
        .context("failed to connect to model runtime")?;

    let lifecycle = ModelLifecycle::new(runtime, config, span);

    // Ctrl-C ends the hold early and the model is still unloaded; a second
    // Ctrl-C exits straight away
    let cancel = lifecycle.cancellation_token();
    tokio::spawn(async move {
        if cancel_on_interrupt(cancel, tokio::signal::ctrl_c).await {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    let report = lifecycle.run().await?;
    Ok(report)
}
