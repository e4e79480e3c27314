//! Diagnostic channel.
//!
//! Records one JSON line per refresh or analyze outcome in
//! `~/.sentiview/events.jsonl`, and echoes failures to stderr as
//! `[sentiview] ...` when enabled. Logging is best-effort: an unwritable log
//! never fails the caller.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// One line of the diagnostic log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub timestamp: String,
    /// What was refreshed: `analyze`, `chart:<target>`, `wordcloud:<kind>`.
    pub target: String,
    /// `"ok"` or `"failed"`.
    pub outcome: String,
    /// Failure tag, e.g. `request_failed` or `unreachable`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub latency_ms: u64,
}

impl DiagnosticEvent {
    pub fn is_failure(&self) -> bool {
        self.outcome == "failed"
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Where diagnostic events go.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    log_path: Option<PathBuf>,
    stderr: bool,
}

impl Diagnostics {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            log_path: if config.enabled {
                events_log_path()
            } else {
                None
            },
            stderr: config.stderr,
        }
    }

    /// Drop every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Log to an explicit file, without stderr echo.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: Some(path.into()),
            stderr: false,
        }
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    pub fn record_ok(&self, target: &str, latency_ms: u64) {
        self.record(&DiagnosticEvent {
            timestamp: Utc::now().to_rfc3339(),
            target: target.to_string(),
            outcome: "ok".to_string(),
            kind: None,
            message: None,
            latency_ms,
        });
    }

    pub fn record_failure(&self, target: &str, kind: &str, message: &str, latency_ms: u64) {
        if self.stderr {
            eprintln!("[sentiview] {target} failed: {message}");
        }
        self.record(&DiagnosticEvent {
            timestamp: Utc::now().to_rfc3339(),
            target: target.to_string(),
            outcome: "failed".to_string(),
            kind: Some(kind.to_string()),
            message: Some(message.to_string()),
            latency_ms,
        });
    }

    pub fn record(&self, event: &DiagnosticEvent) {
        if let Some(path) = &self.log_path {
            let _ = append_event(path, event);
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// The last `limit` events of the log at `path`, oldest first.
///
/// Malformed lines are skipped; a missing file yields an empty list.
pub fn read_recent(path: &Path, limit: usize) -> Vec<DiagnosticEvent> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let events: Vec<DiagnosticEvent> = BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect();

    let skip = events.len().saturating_sub(limit);
    events.into_iter().skip(skip).collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_event(path: &Path, event: &DiagnosticEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Default location of the diagnostic log.
pub fn events_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sentiview").join("events.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
