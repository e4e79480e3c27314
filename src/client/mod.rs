/// Request dispatcher for the sentiment-analysis backend.
///
/// Issues the four backend calls (`/analyze`, `/stats`, `/wordcloud/positive`,
/// `/wordcloud/negative`) with the synchronous `ureq` client, opens the
/// response envelope and normalizes the payload before handing it to the
/// renderers.
///
/// The [`Backend`] trait is the seam the refresh controller depends on, so
/// the controller can be driven by an in-memory backend in tests.
pub mod envelope;

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::schema::BackendConfig;
use crate::error::DashboardError;
use crate::models::{AnalysisResult, WordcloudKind, WordcloudResponse};
use crate::normalize::{self, StatsSnapshot};

use envelope::open_envelope;

/// Fallback message for a failed `/analyze` call.
pub const ANALYZE_FAILED: &str = "Analysis failed";
/// Fallback message for a failed `/stats` call.
pub const STATS_FAILED: &str = "Failed to load dashboard data";
/// Fallback message for a failed word-cloud call.
pub const WORDCLOUD_FAILED: &str = "Failed to load word cloud";

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// The calls the dashboard makes against the analysis backend.
///
/// Implementations return fully normalized values; envelope and shape
/// problems are reported through [`DashboardError`].
pub trait Backend {
    /// Classify `text`. Blank input fails with [`DashboardError::EmptyInput`].
    fn analyze(&self, text: &str) -> Result<AnalysisResult, DashboardError>;

    /// Fetch and normalize the aggregate statistics.
    fn stats(&self) -> Result<StatsSnapshot, DashboardError>;

    /// Fetch one word-cloud image (or the server's reason for not having one).
    fn wordcloud(&self, kind: WordcloudKind) -> Result<WordcloudResponse, DashboardError>;
}

/// Trim the input and reject it when nothing is left.
pub fn prepare_text(text: &str) -> Result<&str, DashboardError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::EmptyInput);
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Request body for `POST /analyze`.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Synchronous HTTP client for the analysis backend.
///
/// Cheap to build; every request carries the configured timeout and a
/// timeout or connection failure is reported as
/// [`DashboardError::Unreachable`].
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    timeout: Duration,
}

impl DashboardClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Build a client from the resolved `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check that the backend answers `/stats` with a success envelope.
    pub fn is_healthy(&self) -> bool {
        self.get("/stats", STATS_FAILED).is_ok()
    }

    fn url(&self, path: &str) -> String {
        // "localhost" may resolve to ::1 first on some hosts while the
        // backend only binds IPv4.
        format!("{}{}", self.base_url, path).replace("://localhost", "://127.0.0.1")
    }

    fn get(&self, path: &str, default_message: &str) -> Result<Value, DashboardError> {
        let request = ureq::get(&self.url(path)).timeout(self.timeout);
        exchange(request.call(), default_message)
    }

    fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        default_message: &str,
    ) -> Result<Value, DashboardError> {
        let request = ureq::post(&self.url(path)).timeout(self.timeout);
        exchange(request.send_json(body), default_message)
    }
}

impl Backend for DashboardClient {
    fn analyze(&self, text: &str) -> Result<AnalysisResult, DashboardError> {
        let text = prepare_text(text)?;
        let data = self.post("/analyze", &AnalyzeRequest { text }, ANALYZE_FAILED)?;
        normalize::analysis_result(&data)
    }

    fn stats(&self) -> Result<StatsSnapshot, DashboardError> {
        let data = self.get("/stats", STATS_FAILED)?;
        Ok(normalize::stats_snapshot(&data))
    }

    fn wordcloud(&self, kind: WordcloudKind) -> Result<WordcloudResponse, DashboardError> {
        let data = self.get(kind.path(), WORDCLOUD_FAILED)?;
        Ok(normalize::wordcloud(&data))
    }
}

/// Turn a `ureq` outcome into an opened envelope.
///
/// `ureq` reports 4xx/5xx as `Error::Status`; the body is still read so the
/// server's `message` can be surfaced.
fn exchange(
    outcome: Result<ureq::Response, ureq::Error>,
    default_message: &str,
) -> Result<Value, DashboardError> {
    let (status, body) = match outcome {
        Ok(response) => {
            let status = response.status();
            let body = response
                .into_string()
                .map_err(|_| DashboardError::RequestFailed(default_message.to_string()))?;
            (status, body)
        }
        Err(ureq::Error::Status(status, response)) => {
            (status, response.into_string().unwrap_or_default())
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(DashboardError::Unreachable(transport.to_string()));
        }
    };

    open_envelope(status, &body, default_message)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = DashboardClient::from_config(&BackendConfig::default());
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = DashboardClient::new("http://localhost:5000/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/stats"), "http://127.0.0.1:5000/stats");
    }

    #[test]
    fn prepare_text_trims_and_rejects_blank() {
        assert_eq!(prepare_text("  hello \n"), Ok("hello"));
        assert_eq!(prepare_text(" \t\n"), Err(DashboardError::EmptyInput));
        assert_eq!(prepare_text(""), Err(DashboardError::EmptyInput));
    }

    #[test]
    fn blank_input_never_reaches_the_network() {
        // Port 9 (discard) is never contacted: the error comes first.
        let client = DashboardClient::new("http://127.0.0.1:9", Duration::from_millis(50));
        assert_eq!(client.analyze("   "), Err(DashboardError::EmptyInput));
    }
}
