use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// Severity of a [`LogRecord`], serialized as its upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic log entry.
///
/// The record has no timestamp of its own: the writer stamps it at the
/// moment the line is appended, so the file reflects emission order.
/// Optional fields left unset (or empty / zero) are omitted from the
/// serialized line entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: Level,
    pub service: String,
    pub message: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "is_unset")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "is_unset_status")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "is_blank")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub component: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn is_unset(value: &Option<u64>) -> bool {
    value.map_or(true, |v| v == 0)
}

fn is_unset_status(value: &Option<u16>) -> bool {
    value.map_or(true, |v| v == 0)
}

impl LogRecord {
    pub fn new(level: Level, service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            service: service.into(),
            message: message.into(),
            user_id: None,
            endpoint: None,
            response_time_ms: None,
            status_code: None,
            region: None,
            component: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn response_time_ms(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    pub fn status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Serialize the record as one NDJSON line (trailing `\n` included),
    /// stamped with `at`.
    pub fn to_line(&self, at: DateTime<Utc>) -> Result<Vec<u8>, serde_json::Error> {
        let stamped = StampedRecord {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            record: self,
        };
        let mut line = serde_json::to_vec(&stamped)?;
        line.push(b'\n');
        Ok(line)
    }
}

#[derive(Serialize)]
struct StampedRecord<'a> {
    timestamp: String,
    #[serde(flatten)]
    record: &'a LogRecord,
}
