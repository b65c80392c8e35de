use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Configuration of the process's own diagnostics.
///
/// These are the generator's operational messages (startup, rotation
/// warnings, shutdown), not the synthetic records written to the log
/// file.
///
/// **Fields**
/// - `enable_stdout`: if `false`, no console layer is installed and the
///   process runs silently.
/// - `max_level`: most verbose level that is printed.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub enable_stdout: bool,
    pub max_level: LevelFilter,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enable_stdout: true,
            max_level: LevelFilter::INFO,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] SetGlobalDefaultError),
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Console output goes to stderr so it never mixes with anything a
/// supervisor might capture from stdout.
pub fn init_tracing_with_config(config: TracingConfig) -> Result<(), InitError> {
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(config.max_level);
        let subscriber = Registry::default().with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        tracing::subscriber::set_global_default(Registry::default())?;
    }
    Ok(())
}

/// Initialize tracing with [`TracingConfig::default`].
pub fn init_tracing() -> Result<(), InitError> {
    init_tracing_with_config(TracingConfig::default())
}
