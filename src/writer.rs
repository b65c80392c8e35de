use crate::record::LogRecord;
use crate::sink::LogSink;
use async_trait::async_trait;
use chrono::Utc;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::{debug, warn};

/// Default size threshold for the active file: 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated files kept next to the active one.
pub const DEFAULT_MAX_FILES: i32 = 5;

/// Configuration for [`RotatingFileWriter`].
///
/// **Fields**
/// - `path`: the active file. Rotated files live next to it as
///   `<path>.1` (newest) up to `<path>.<max_files>` (oldest).
/// - `max_bytes`: once the active file is at least this large, the next
///   write rotates it first.
/// - `max_files`: retention count. Values of `1` or less mean no shifting
///   takes place and every rotation overwrites `<path>.1`.
#[derive(Clone, Debug)]
pub struct RotationConfig {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub max_files: i32,
}

impl RotationConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    /// Path of the rotated file with the given index, e.g. `app.log.3`.
    pub fn rotated_path(&self, index: i32) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }
}

/// Fatal errors from [`RotatingFileWriter::write`].
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("failed to open log file '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to append to log file '{path}': {source}")]
    Append { path: PathBuf, source: io::Error },

    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Size-rotated, append-only NDJSON writer.
///
/// Every call re-reads the active file's metadata to decide whether to
/// rotate; nothing about the file is cached between calls. The writer
/// assumes it is the only one touching `path`: two writers (in one
/// process or several) racing on the same file may interleave rotations.
#[derive(Clone, Debug)]
pub struct RotatingFileWriter {
    config: RotationConfig,
    /// Rotation cycles performed (active file moved to `<path>.1`).
    pub rotations: Arc<AtomicU64>,
    /// Renames that failed and were skipped.
    pub rotation_failures: Arc<AtomicU64>,
    /// Records appended successfully.
    pub written_records: Arc<AtomicU64>,
}

impl RotatingFileWriter {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            rotations: Arc::new(AtomicU64::new(0)),
            rotation_failures: Arc::new(AtomicU64::new(0)),
            written_records: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Rotate the active file if it reached the threshold, then append
    /// `record` as a single line stamped with the current time.
    ///
    /// **Returns**
    /// - `Ok(())` once the line is written and the handle is closed.
    /// - `Err(WriteError)` if the active file cannot be opened or written.
    ///   Rename failures during rotation never surface here.
    pub fn write(&self, record: &LogRecord) -> Result<(), WriteError> {
        self.rotate_if_needed();

        let path = &self.config.path;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| WriteError::Open {
                path: path.clone(),
                source,
            })?;

        let line = record.to_line(Utc::now())?;
        file.write_all(&line).map_err(|source| WriteError::Append {
            path: path.clone(),
            source,
        })?;

        self.written_records.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns `true` if a rotation cycle was run.
    fn rotate_if_needed(&self) -> bool {
        let size = match fs::metadata(&self.config.path) {
            Ok(meta) => meta.len(),
            Err(_) => return false,
        };
        if size < self.config.max_bytes {
            return false;
        }

        debug!(
            path = %self.config.path.display(),
            size,
            max_bytes = self.config.max_bytes,
            "rotating log file"
        );

        // Highest index first so that `<path>.max_files` is overwritten.
        for index in (1..self.config.max_files).rev() {
            let from = self.config.rotated_path(index);
            let to = self.config.rotated_path(index + 1);
            self.rename_best_effort(&from, &to);
        }

        let newest = self.config.rotated_path(1);
        if self.rename_best_effort(&self.config.path, &newest) {
            self.rotations.fetch_add(1, Ordering::Relaxed);
        }
        true
    }

    fn rename_best_effort(&self, from: &Path, to: &Path) -> bool {
        match fs::rename(from, to) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                self.rotation_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %e,
                    "log rotation rename failed, continuing"
                );
                false
            }
        }
    }
}

#[async_trait]
impl LogSink for RotatingFileWriter {
    async fn send(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let writer = self.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || writer.write(&record)).await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Level;
    use tempfile::TempDir;

    #[test]
    fn rotated_path_appends_index() {
        let config = RotationConfig::new("/var/log/app.log");
        assert_eq!(config.rotated_path(1), PathBuf::from("/var/log/app.log.1"));
        assert_eq!(config.rotated_path(12), PathBuf::from("/var/log/app.log.12"));
    }

    #[test]
    fn defaults_are_ten_mib_and_five_files() {
        let config = RotationConfig::new("app.log");
        assert_eq!(config.max_bytes, 10_485_760);
        assert_eq!(config.max_files, 5);
    }

    #[test]
    fn missing_active_file_skips_rotation() {
        let dir = TempDir::new().unwrap();
        let mut config = RotationConfig::new(dir.path().join("app.log"));
        config.max_bytes = 1;
        let writer = RotatingFileWriter::new(config.clone());

        assert!(!writer.rotate_if_needed());
        writer.write(&LogRecord::new(Level::Info, "svc", "first")).unwrap();

        assert!(config.path.exists());
        assert!(!config.rotated_path(1).exists());
        assert_eq!(writer.rotations.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn open_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = RotationConfig::new(dir.path().join("missing-dir").join("app.log"));
        let writer = RotatingFileWriter::new(config);

        let err = writer
            .write(&LogRecord::new(Level::Error, "svc", "boom"))
            .unwrap_err();
        assert!(matches!(err, WriteError::Open { .. }));
        assert_eq!(writer.written_records.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn failed_shift_is_counted_but_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = RotationConfig::new(dir.path().join("app.log"));
        config.max_bytes = 1;
        config.max_files = 2;
        fs::write(&config.path, "old active\n").unwrap();
        fs::write(config.rotated_path(1), "old one\n").unwrap();
        // A directory at `.2` cannot be replaced by a plain file.
        fs::create_dir(config.rotated_path(2)).unwrap();
        fs::write(config.rotated_path(2).join("keep"), "x").unwrap();

        let writer = RotatingFileWriter::new(config.clone());
        writer.write(&LogRecord::new(Level::Info, "svc", "new")).unwrap();

        assert_eq!(writer.rotation_failures.load(Ordering::Relaxed), 1);
        assert_eq!(writer.rotations.load(Ordering::Relaxed), 1);
        assert_eq!(fs::read_to_string(config.rotated_path(1)).unwrap(), "old active\n");
        assert!(fs::read_to_string(&config.path).unwrap().contains("\"message\":\"new\""));
    }
}
