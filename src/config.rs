//! Environment variable names read once at process start.
//!
//! The core types ([`RotationConfig`], [`TickInterval`], ...) stay
//! decoupled from environment access; this module only builds them.

use crate::generator::{GenerationMode, UnknownMode};
use crate::runner::TickInterval;
use crate::writer::RotationConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Active log file path, e.g. `/var/log/app.log`.
pub const LOGGEN_PATH_ENV: &str = "LOGGEN_PATH";

/// Size threshold in bytes that triggers rotation.
pub const LOGGEN_MAX_BYTES_ENV: &str = "LOGGEN_MAX_BYTES";

/// Number of rotated files to retain. Zero or negative is accepted.
pub const LOGGEN_MAX_FILES_ENV: &str = "LOGGEN_MAX_FILES";

/// Lower bound of the delay between ticks, in milliseconds.
pub const LOGGEN_INTERVAL_MIN_MS_ENV: &str = "LOGGEN_INTERVAL_MIN_MS";

/// Upper bound of the delay between ticks, in milliseconds.
pub const LOGGEN_INTERVAL_MAX_MS_ENV: &str = "LOGGEN_INTERVAL_MAX_MS";

/// Value of the `service` field on every record.
pub const LOGGEN_SERVICE_ENV: &str = "LOGGEN_SERVICE";

/// `random` or `fixed`.
pub const LOGGEN_MODE_ENV: &str = "LOGGEN_MODE";

/// Optional RNG seed for reproducible output.
pub const LOGGEN_SEED_ENV: &str = "LOGGEN_SEED";

/// Whether diagnostics are printed to the console.
pub const LOGGEN_STDOUT_ENV: &str = "LOGGEN_STDOUT";

pub const DEFAULT_PATH: &str = "/var/log/app.log";
pub const DEFAULT_SERVICE: &str = "go-logging-service";
pub const DEFAULT_INTERVAL_MS: u64 = 5_000;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Mode(#[from] UnknownMode),
}

/// Everything the binary needs to start.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub rotation: RotationConfig,
    pub interval: TickInterval,
    pub service: String,
    pub mode: GenerationMode,
    pub seed: Option<u64>,
    pub enable_stdout: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rotation: RotationConfig::new(DEFAULT_PATH),
            interval: TickInterval::fixed(Duration::from_millis(DEFAULT_INTERVAL_MS)),
            service: DEFAULT_SERVICE.to_string(),
            mode: GenerationMode::default(),
            seed: None,
            enable_stdout: true,
        }
    }
}

impl GeneratorConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys
    /// keep their defaults; set but unparseable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(LOGGEN_PATH_ENV) {
            config.rotation.path = PathBuf::from(path);
        }
        if let Some(max_bytes) = parse(&lookup, LOGGEN_MAX_BYTES_ENV)? {
            config.rotation.max_bytes = max_bytes;
        }
        if let Some(max_files) = parse(&lookup, LOGGEN_MAX_FILES_ENV)? {
            config.rotation.max_files = max_files;
        }

        let min = parse::<u64, _>(&lookup, LOGGEN_INTERVAL_MIN_MS_ENV)?;
        let max = parse::<u64, _>(&lookup, LOGGEN_INTERVAL_MAX_MS_ENV)?;
        config.interval = match (min, max) {
            (None, None) => config.interval,
            (Some(ms), None) | (None, Some(ms)) => TickInterval::fixed(Duration::from_millis(ms)),
            (Some(min), Some(max)) => {
                TickInterval::jittered(Duration::from_millis(min), Duration::from_millis(max))
            }
        };

        if let Some(service) = lookup(LOGGEN_SERVICE_ENV) {
            config.service = service;
        }
        if let Some(mode) = lookup(LOGGEN_MODE_ENV) {
            config.mode = mode.parse()?;
        }
        config.seed = parse(&lookup, LOGGEN_SEED_ENV)?;
        if let Some(enable_stdout) = parse(&lookup, LOGGEN_STDOUT_ENV)? {
            config.enable_stdout = enable_stdout;
        }

        Ok(config)
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = GeneratorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.rotation.path, PathBuf::from(DEFAULT_PATH));
        assert_eq!(config.rotation.max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(config.rotation.max_files, DEFAULT_MAX_FILES);
        assert_eq!(config.interval, TickInterval::fixed(Duration::from_secs(5)));
        assert_eq!(config.mode, GenerationMode::Random);
        assert_eq!(config.service, "go-logging-service");
        assert_eq!(config.seed, None);
        assert!(config.enable_stdout);
    }

    #[test]
    fn overrides_are_applied() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            (LOGGEN_PATH_ENV, "/tmp/gen.log"),
            (LOGGEN_MAX_BYTES_ENV, "100"),
            (LOGGEN_MAX_FILES_ENV, "-1"),
            (LOGGEN_INTERVAL_MIN_MS_ENV, "200"),
            (LOGGEN_INTERVAL_MAX_MS_ENV, "900"),
            (LOGGEN_SERVICE_ENV, "checkout"),
            (LOGGEN_MODE_ENV, "fixed"),
            (LOGGEN_SEED_ENV, "99"),
            (LOGGEN_STDOUT_ENV, "false"),
        ]))
        .unwrap();

        assert_eq!(config.rotation.path, PathBuf::from("/tmp/gen.log"));
        assert_eq!(config.rotation.max_bytes, 100);
        assert_eq!(config.rotation.max_files, -1);
        assert_eq!(
            config.interval,
            TickInterval::jittered(Duration::from_millis(200), Duration::from_millis(900))
        );
        assert_eq!(config.service, "checkout");
        assert_eq!(config.mode, GenerationMode::Fixed);
        assert_eq!(config.seed, Some(99));
        assert!(!config.enable_stdout);
    }

    #[test]
    fn single_interval_bound_is_fixed() {
        let config =
            GeneratorConfig::from_lookup(lookup_from(&[(LOGGEN_INTERVAL_MAX_MS_ENV, "750")]))
                .unwrap();
        assert_eq!(config.interval, TickInterval::fixed(Duration::from_millis(750)));
    }

    #[test]
    fn garbage_is_rejected_with_key_name() {
        let err = GeneratorConfig::from_lookup(lookup_from(&[(LOGGEN_MAX_BYTES_ENV, "ten")]))
            .unwrap_err();
        match err {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, LOGGEN_MAX_BYTES_ENV);
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = GeneratorConfig::from_lookup(lookup_from(&[(LOGGEN_MODE_ENV, "loud")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Mode(_)));
    }
}
