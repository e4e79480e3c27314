//! Route handlers for the dashboard server.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::client::Backend;
use crate::dashboard;
use crate::page::render_page;

use super::{Reply, Session};

/// Body of `POST /analyze`.
#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    text: String,
}

/// `GET /`: run the page-load refresh and render the dashboard.
pub fn index<B: Backend>(session: &mut Session<B>) -> Reply {
    dashboard::page_load(&session.backend, &mut session.state, &session.diagnostics);
    Reply::html(render_page(&session.state, &session.page))
}

/// `POST /analyze`: run the analyze flow and render the resulting page.
///
/// Analysis failures are shown in the result region, so the reply is a
/// page either way; only an unreadable body is a client error.
pub fn analyze<B: Backend>(session: &mut Session<B>, body: &str) -> Result<Reply> {
    let request: AnalyzeBody = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            return Ok(Reply::json(
                400,
                &serde_json::json!({ "error": format!("invalid request body: {e}") }),
            ));
        }
    };

    let _ = dashboard::analyze(
        &session.backend,
        &mut session.state,
        &session.diagnostics,
        &request.text,
    );

    Ok(Reply::html(render_page(&session.state, &session.page)))
}

/// `GET /api/state`: the current dashboard state as JSON.
pub fn state<B: Backend>(session: &Session<B>) -> Result<Reply> {
    let value = serde_json::to_value(&session.state).context("failed to serialize state")?;
    Ok(Reply::json(200, &value))
}

/// `GET /health`.
pub fn health() -> Reply {
    Reply::json(200, &serde_json::json!({ "status": "ok" }))
}
