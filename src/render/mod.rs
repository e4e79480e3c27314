//! Result renderer.
//!
//! Turns a normalized [`AnalysisResult`] (or the failure that replaced it)
//! into a [`ResultView`]: the display fragment for the result region. The
//! view keeps the label/class pairing as data so callers can check it
//! without parsing markup.

use serde::Serialize;

use crate::error::DashboardError;
use crate::models::{AnalysisResult, Label};

/// Characters of input kept in the excerpt before the ellipsis.
pub const EXCERPT_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Visual state of the result region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultClass {
    /// Nothing analyzed yet.
    Idle,
    Loading,
    Positive,
    Negative,
    Error,
}

impl ResultClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Error => "error",
        }
    }
}

impl From<Label> for ResultClass {
    fn from(label: Label) -> Self {
        match label {
            Label::Positive => Self::Positive,
            Label::Negative => Self::Negative,
        }
    }
}

/// Contents of the result region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub class: ResultClass,
    pub label: Option<Label>,
    pub excerpt: Option<String>,
    pub score_text: Option<String>,
    pub message: Option<String>,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            class: ResultClass::Idle,
            label: None,
            excerpt: None,
            score_text: None,
            message: None,
        }
    }
}

impl ResultView {
    /// Successful classification of `input`.
    pub fn success(input: &str, result: &AnalysisResult) -> Self {
        Self {
            class: result.label.into(),
            label: Some(result.label),
            excerpt: Some(excerpt(input)),
            score_text: Some(score_percent(result.score)),
            message: None,
        }
    }

    /// Failure display. The message comes from [`DashboardError::user_message`].
    pub fn failure(error: &DashboardError) -> Self {
        Self {
            class: ResultClass::Error,
            message: Some(error.user_message()),
            ..Self::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            class: ResultClass::Loading,
            message: Some("Analyzing...".to_string()),
            ..Self::default()
        }
    }

    /// Class attribute for the result container.
    pub fn container_class(&self) -> String {
        match self.class {
            ResultClass::Idle => "result".to_string(),
            class => format!("result {}", class.as_str()),
        }
    }

    /// Text shown in the error region, `None` unless this is a failure.
    pub fn error_text(&self) -> Option<String> {
        match (self.class, &self.message) {
            (ResultClass::Error, Some(message)) => Some(format!("Error: {message}")),
            _ => None,
        }
    }

    /// Inner HTML for the result container.
    pub fn to_html(&self) -> String {
        match self.class {
            ResultClass::Idle => String::new(),
            ResultClass::Loading => format!(
                r#"<div class="loading">{}</div>"#,
                escape_html(self.message.as_deref().unwrap_or_default())
            ),
            ResultClass::Error => format!(
                r#"<div class="error-message">{}</div>"#,
                escape_html(&self.error_text().unwrap_or_default())
            ),
            ResultClass::Positive | ResultClass::Negative => {
                let label = self.label.unwrap_or(Label::Positive);
                format!(
                    concat!(
                        "<h3>Analysis Result</h3>\n",
                        "<p><strong>Text:</strong> \"{excerpt}\"</p>\n",
                        "<p><strong>Sentiment:</strong> ",
                        "<span class=\"sentiment-label\" style=\"font-weight: bold; color: {color}\">",
                        "{label} ({score})</span></p>"
                    ),
                    excerpt = escape_html(self.excerpt.as_deref().unwrap_or_default()),
                    color = label.color(),
                    label = label,
                    score = self.score_text.as_deref().unwrap_or_default(),
                )
            }
        }
    }
}

/// First [`EXCERPT_CHARS`] characters of `text`, with `...` appended only
/// when something was cut.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Score in `[0, 1]` as a percentage with one decimal place.
pub fn score_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
