use crate::record::LogRecord;
use async_trait::async_trait;
use std::error::Error;

/// Asynchronous destination for [`LogRecord`]s produced by the generator.
///
/// The runner calls `send` once per record, in generation order, and
/// awaits each call before producing the next one. Any error returned is
/// treated as fatal: the runner stops and reports it.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Persist a single log record.
    ///
    /// **Parameters**
    /// - `record`: fully-populated [`LogRecord`]; the sink is responsible
    ///   for stamping the emission time.
    ///
    /// **Returns**
    /// - `Ok(())` once the record is durably handed to the backend (for
    ///   the file sink: appended and the handle released).
    /// - `Err(..)` if the backend cannot accept records any more.
    async fn send(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush any buffered records, if the backend implements buffering.
    ///
    /// Default implementation is a no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
