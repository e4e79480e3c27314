//! Local dashboard server.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The rendered dashboard page, refreshed on every load
//! - `POST /analyze`, which runs the analyze flow and returns the new page
//! - JSON endpoints for the current dashboard state and liveness
//!
//! Launched via `sentiview serve` (default: `http://127.0.0.1:9747`).

mod api;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::client::{Backend, DashboardClient};
use crate::config::SentiviewConfig;
use crate::dashboard::DashboardState;
use crate::diagnostics::Diagnostics;
use crate::page::PageContext;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything one server owns: the backend, the dashboard it keeps
/// refreshing, and where diagnostics go.
pub struct Session<B: Backend> {
    pub backend: B,
    pub state: DashboardState,
    pub diagnostics: Diagnostics,
    pub page: PageContext,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, diagnostics: Diagnostics, page: PageContext) -> Self {
        Self {
            backend,
            state: DashboardState::new(),
            diagnostics,
            page,
        }
    }
}

/// A response before it is handed to `tiny_http`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

impl Reply {
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: HTML,
            body: body.into_bytes(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: JSON,
            body: value.to_string().into_bytes(),
        }
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        Response::from_data(self.body)
            .with_header(content_type(self.content_type))
            .with_status_code(StatusCode(self.status))
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on `addr`.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Errors are answered per request without
/// stopping the server.
pub fn serve(config: &SentiviewConfig, addr: &str) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let backend = DashboardClient::from_config(&config.backend);
    let page = PageContext {
        backend_url: backend.base_url().to_string(),
        interactive: true,
        top_words: config.display.top_words,
    };
    let mut session = Session::new(backend, Diagnostics::from_config(&config.logging), page);

    println!("sentiview dashboard running at http://{addr}");
    println!("Backend: {}", session.page.backend_url);
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Post | Method::Put) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = dispatch(&mut session, &method, &url, body.as_deref()).unwrap_or_else(|e| {
            Reply::json(500, &serde_json::json!({ "error": e.to_string() }))
        });
        let status = reply.status;
        let _ = request.respond(reply.into_response());

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub fn dispatch<B: Backend>(
    session: &mut Session<B>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Reply> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(api::index(session)),
        (&Method::Post, "/analyze") => api::analyze(session, body.unwrap_or("{}")),
        (&Method::Get, "/api/state") => api::state(session),
        (&Method::Get, "/health") => Ok(api::health()),
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn not_found() -> Reply {
    Reply::json(404, &serde_json::json!({ "error": "not found" }))
}

fn content_type(value: &str) -> Header {
    Header::from_bytes("Content-Type", value).expect("static content type is a valid header")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::error::DashboardError;
    use crate::models::{AnalysisResult, Label, WordcloudKind, WordcloudResponse};
    use crate::normalize::{StatsSnapshot, stats_snapshot};

    #[derive(Default)]
    struct StubBackend {
        analyze_calls: Cell<usize>,
    }

    impl Backend for StubBackend {
        fn analyze(&self, _text: &str) -> Result<AnalysisResult, DashboardError> {
            self.analyze_calls.set(self.analyze_calls.get() + 1);
            Ok(AnalysisResult {
                label: Label::Positive,
                score: 0.91,
            })
        }

        fn stats(&self) -> Result<StatsSnapshot, DashboardError> {
            Ok(stats_snapshot(&serde_json::json!({
                "sentiment_counts": {"POSITIVE": 3, "NEGATIVE": 1}
            })))
        }

        fn wordcloud(&self, _kind: WordcloudKind) -> Result<WordcloudResponse, DashboardError> {
            Err(DashboardError::Unreachable("connection refused".into()))
        }
    }

    fn session() -> Session<StubBackend> {
        Session::new(
            StubBackend::default(),
            Diagnostics::disabled(),
            PageContext {
                backend_url: "http://stub".into(),
                interactive: true,
                top_words: 5,
            },
        )
    }

    fn body(reply: &Reply) -> String {
        String::from_utf8(reply.body.clone()).unwrap()
    }

    #[test]
    fn index_refreshes_and_renders() {
        let mut s = session();
        let reply = dispatch(&mut s, &Method::Get, "/", None).unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, HTML);
        assert!(body(&reply).contains("Failed to load word cloud"));
        assert!(s.state.chart(crate::dashboard::charts::ChartTarget::Pie).is_some());
    }

    #[test]
    fn analyze_renders_result() {
        let mut s = session();
        let reply = dispatch(
            &mut s,
            &Method::Post,
            "/analyze",
            Some(r#"{"text": "great product"}"#),
        )
        .unwrap();
        assert_eq!(reply.status, 200);
        assert!(body(&reply).contains("POSITIVE (91.0%)"));
        assert_eq!(s.backend.analyze_calls.get(), 1);
    }

    #[test]
    fn analyze_blank_text_skips_backend() {
        let mut s = session();
        let reply = dispatch(&mut s, &Method::Post, "/analyze", Some(r#"{"text": "  "}"#)).unwrap();
        assert!(body(&reply).contains("Error: Please enter some text"));
        assert_eq!(s.backend.analyze_calls.get(), 0);
    }

    #[test]
    fn analyze_rejects_bad_json() {
        let mut s = session();
        let reply = dispatch(&mut s, &Method::Post, "/analyze", Some("text=hi")).unwrap();
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn state_and_health_are_json() {
        let mut s = session();
        let state = dispatch(&mut s, &Method::Get, "/api/state?x=1", None).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&state.body).unwrap();
        assert_eq!(parsed["result"]["class"], "idle");

        let health = dispatch(&mut s, &Method::Get, "/health", None).unwrap();
        assert_eq!(body(&health), r#"{"status":"ok"}"#);
    }

    #[test]
    fn unknown_route_is_404() {
        let mut s = session();
        let reply = dispatch(&mut s, &Method::Get, "/nope", None).unwrap();
        assert_eq!(reply.status, 404);
    }
}
