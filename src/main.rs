use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use synthetic_log_generator::config::GeneratorConfig;
use synthetic_log_generator::generator::Generator;
use synthetic_log_generator::init::{init_tracing_with_config, TracingConfig};
use synthetic_log_generator::runner::Runner;
use synthetic_log_generator::shutdown::spawn_shutdown_listener;
use synthetic_log_generator::writer::RotatingFileWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match GeneratorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let tracing_config = TracingConfig {
        enable_stdout: config.enable_stdout,
        ..TracingConfig::default()
    };
    if let Err(e) = init_tracing_with_config(tracing_config) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    info!(
        path = %config.rotation.path.display(),
        max_bytes = config.rotation.max_bytes,
        max_files = config.rotation.max_files,
        service = %config.service,
        "starting log generator service"
    );

    let generator = match config.seed {
        Some(seed) => Generator::seeded(config.service.clone(), config.mode, seed),
        None => Generator::new(config.service.clone(), config.mode),
    };
    let writer = RotatingFileWriter::new(config.rotation.clone());
    let rotation_failures = Arc::clone(&writer.rotation_failures);
    let mut runner = Runner::new(generator, Arc::new(writer), config.interval);

    let cancel = CancellationToken::new();
    if let Err(e) = spawn_shutdown_listener(cancel.clone()) {
        error!(error = %e, "cannot install shutdown signal handlers");
        return ExitCode::FAILURE;
    }

    match runner.run(cancel).await {
        Ok(stats) => {
            info!(
                ticks = stats.ticks,
                records = stats.records,
                rotation_failures = rotation_failures.load(std::sync::atomic::Ordering::Relaxed),
                "log generator exited"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "fatal write failure, terminating");
            ExitCode::FAILURE
        }
    }
}
