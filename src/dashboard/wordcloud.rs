//! Word-cloud image slots.
//!
//! Each slot pairs an image with a loading indicator. The two slots are
//! refreshed independently; a failure in one never touches the other.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::SlotStatus;
use crate::client::WORDCLOUD_FAILED;
use crate::error::DashboardError;
use crate::models::{WordcloudKind, WordcloudResponse};

/// Text of the loading indicator while a request is in flight.
pub const LOADING_TEXT: &str = "Loading word cloud...";

/// `data:<mime>[;params],<payload>` with an optional `;base64` marker.
static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+)?(?P<params>(?:;[\w.+-]+(?:=[^;,]*)?)*),")
        .expect("data URI regex must compile")
});

/// Display state of one word-cloud slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordcloudSlot {
    pub kind: WordcloudKind,
    pub loading_visible: bool,
    pub loading_text: String,
    pub image_src: Option<String>,
    pub image_visible: bool,
    pub status: SlotStatus,
}

impl WordcloudSlot {
    pub fn new(kind: WordcloudKind) -> Self {
        Self {
            kind,
            loading_visible: true,
            loading_text: LOADING_TEXT.to_string(),
            image_src: None,
            image_visible: false,
            status: SlotStatus::Empty,
        }
    }

    /// Show the loading indicator and hide the image.
    pub fn begin_loading(&mut self) {
        self.loading_visible = true;
        self.loading_text = LOADING_TEXT.to_string();
        self.image_visible = false;
    }

    /// Apply the outcome of a word-cloud request.
    ///
    /// An image replaces the indicator. Without one, the indicator stays and
    /// shows the server's message (or a per-kind fallback). Any failure
    /// degrades to a generic message.
    pub fn apply(&mut self, outcome: Result<WordcloudResponse, DashboardError>) {
        match outcome {
            Ok(WordcloudResponse {
                image: Some(image), ..
            }) => {
                self.image_src = Some(image);
                self.image_visible = true;
                self.loading_visible = false;
                self.status = SlotStatus::Ready;
            }
            Ok(WordcloudResponse { image: None, message }) => {
                self.loading_text =
                    message.unwrap_or_else(|| self.kind.fallback_message().to_string());
                self.loading_visible = true;
                self.image_visible = false;
                self.status = SlotStatus::Ready;
            }
            Err(error) => {
                self.loading_text = WORDCLOUD_FAILED.to_string();
                self.loading_visible = true;
                self.image_visible = false;
                self.status = SlotStatus::from_error(&error);
            }
        }
    }

    /// Image metadata for display when an image is shown.
    pub fn image_info(&self) -> Option<ImageInfo> {
        self.image_src
            .as_deref()
            .filter(|_| self.image_visible)
            .map(ImageInfo::from_src)
    }
}

/// What can be told about an image source without decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// MIME type of a data URI (`text/plain` when the URI omits it), `None`
    /// for ordinary URLs.
    pub mime: Option<String>,
    pub base64: bool,
    /// Length of the encoded payload, or of the whole source for URLs.
    pub payload_len: usize,
}

impl ImageInfo {
    pub fn from_src(src: &str) -> Self {
        let Some(caps) = DATA_URI_RE.captures(src) else {
            return Self {
                mime: None,
                base64: false,
                payload_len: src.len(),
            };
        };

        let header_len = caps.get(0).map_or(0, |m| m.end());
        let params = caps.name("params").map_or("", |m| m.as_str());

        Self {
            mime: Some(
                caps.name("mime")
                    .map_or("text/plain", |m| m.as_str())
                    .to_string(),
            ),
            base64: params.split(';').any(|p| p == "base64"),
            payload_len: src.len() - header_len,
        }
    }

    /// Approximate decoded size in bytes.
    pub fn approx_bytes(&self) -> usize {
        if self.base64 {
            self.payload_len / 4 * 3
        } else {
            self.payload_len
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_loading() {
        let slot = WordcloudSlot::new(WordcloudKind::Positive);
        assert!(slot.loading_visible);
        assert!(!slot.image_visible);
        assert_eq!(slot.loading_text, LOADING_TEXT);
    }

    #[test]
    fn image_replaces_indicator() {
        let mut slot = WordcloudSlot::new(WordcloudKind::Negative);
        slot.apply(Ok(WordcloudResponse {
            image: Some("data:image/png;base64,iVBORw0KGgo=".into()),
            message: None,
        }));
        assert!(slot.image_visible);
        assert!(!slot.loading_visible);
        let info = slot.image_info().unwrap();
        assert_eq!(info.mime.as_deref(), Some("image/png"));
        assert!(info.base64);
        assert_eq!(info.payload_len, 12);
    }

    #[test]
    fn message_shown_without_image() {
        let mut slot = WordcloudSlot::new(WordcloudKind::Positive);
        slot.begin_loading();
        slot.apply(Ok(WordcloudResponse {
            image: None,
            message: Some("none".into()),
        }));
        assert_eq!(slot.loading_text, "none");
        assert!(!slot.image_visible);
        assert!(slot.image_info().is_none());
    }

    #[test]
    fn fallback_message_per_kind() {
        let mut slot = WordcloudSlot::new(WordcloudKind::Negative);
        slot.apply(Ok(WordcloudResponse::default()));
        assert_eq!(slot.loading_text, "No negative word cloud available");
    }

    #[test]
    fn failure_degrades_to_generic_message() {
        let mut slot = WordcloudSlot::new(WordcloudKind::Positive);
        slot.apply(Err(DashboardError::Unreachable("timed out".into())));
        assert_eq!(slot.loading_text, "Failed to load word cloud");
        assert!(matches!(slot.status, SlotStatus::Unreachable(_)));
    }

    #[test]
    fn reload_hides_previous_image() {
        let mut slot = WordcloudSlot::new(WordcloudKind::Positive);
        slot.apply(Ok(WordcloudResponse {
            image: Some("data:image/png;base64,AAAA".into()),
            message: None,
        }));
        slot.begin_loading();
        assert!(!slot.image_visible);
        assert!(slot.loading_visible);
    }

    #[test]
    fn plain_url_has_no_mime() {
        let info = ImageInfo::from_src("/static/cloud.png");
        assert_eq!(info.mime, None);
        assert_eq!(info.payload_len, 17);
    }
}
