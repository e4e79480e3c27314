/// Configuration schema and defaults for sentiview.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[web]`, `[logging]` and `[display]`.
///
/// Every field has a built-in default; users only set what they want to
/// override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level sentiview configuration.
///
/// Maps directly to `~/.sentiview/config.toml` and `.sentiview.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentiviewConfig {
    pub backend: BackendConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the analysis backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; endpoint paths are appended to it.
    pub url: String,
    /// Per-request timeout. An expired request shows as unreachable.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Local dashboard server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub addr: String,
    /// Open the dashboard in the default browser on `serve`.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append diagnostic events to `~/.sentiview/events.jsonl`.
    pub enabled: bool,
    /// Echo failures to stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stderr: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Words listed per label in word-frequency tables.
    pub top_words: usize,
    /// Points shown in the terminal recent-trend summary.
    pub trend_points: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_words: 10,
            trend_points: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl SentiviewConfig {
    /// Annotated default config file, written by `sentiview config init`.
    pub fn default_toml() -> String {
        r#"# sentiview Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SENTIVIEW_*)
#   2. Project config (.sentiview.toml in current directory)
#   3. User global config (~/.sentiview/config.toml)
#   4. Built-in defaults

[backend]
url = "http://127.0.0.1:5000"   # SENTIVIEW_URL
timeout_ms = 10000              # SENTIVIEW_TIMEOUT_MS; expired requests show as unreachable

[web]
addr = "127.0.0.1:9747"         # SENTIVIEW_ADDR
open_browser = true             # SENTIVIEW_OPEN_BROWSER

[logging]
enabled = true                  # SENTIVIEW_LOG; diagnostic log at ~/.sentiview/events.jsonl
stderr = true

[display]
top_words = 10
trend_points = 10
"#
        .to_string()
    }
}
