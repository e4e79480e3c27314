//! Failure taxonomy shared by the dispatcher, renderer and refresh controller.
//!
//! Every variant is recovered locally and turned into a user-visible message;
//! nothing here is meant to escape a refresh cycle as an uncaught failure.

use thiserror::Error;

/// Failures surfaced by a dashboard call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Non-2xx status, unparseable body, or an explicit non-success status.
    ///
    /// Carries the body's `message` verbatim when the server sent one.
    #[error("{0}")]
    RequestFailed(String),

    /// The analyze call succeeded but its payload is not an `AnalysisResult`,
    /// even after unwrapping one level of nesting.
    #[error("malformed analysis result: {0}")]
    MalformedResult(String),

    /// Blank input, rejected before any request is built.
    #[error("input text is empty")]
    EmptyInput,

    /// The backend could not be reached (connection failure or timeout).
    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

impl DashboardError {
    /// Message shown in the result region for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::RequestFailed(message) => message.clone(),
            Self::MalformedResult(_) => "Invalid result format received from server".to_string(),
            Self::EmptyInput => "Please enter some text".to_string(),
            Self::Unreachable(_) => "Sentiment service unreachable".to_string(),
        }
    }

    /// Short machine-readable tag used in the diagnostic log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => "request_failed",
            Self::MalformedResult(_) => "malformed_result",
            Self::EmptyInput => "empty_input",
            Self::Unreachable(_) => "unreachable",
        }
    }
}
