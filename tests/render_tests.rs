/// Result renderer tests.
use sentiview::error::DashboardError;
use sentiview::models::{AnalysisResult, Label};
use sentiview::render::{ResultClass, ResultView, excerpt};

#[test]
fn long_text_is_cut_to_100_chars_with_ellipsis() {
    let text = "a".repeat(150);
    let cut = excerpt(&text);
    assert_eq!(cut, format!("{}...", "a".repeat(100)));
}

#[test]
fn text_up_to_100_chars_is_unchanged() {
    for len in [0, 1, 99, 100] {
        let text = "b".repeat(len);
        assert_eq!(excerpt(&text), text);
    }
    assert_eq!(excerpt(&"c".repeat(101)), format!("{}...", "c".repeat(100)));
}

#[test]
fn excerpt_counts_characters_not_bytes() {
    let text = "é".repeat(120);
    assert_eq!(excerpt(&text), format!("{}...", "é".repeat(100)));
}

#[test]
fn label_drives_the_visual_class() {
    let positive = ResultView::success(
        "love it",
        &AnalysisResult {
            label: Label::Positive,
            score: 0.9876,
        },
    );
    assert_eq!(positive.class, ResultClass::Positive);
    assert_eq!(positive.container_class(), "result positive");
    assert_eq!(positive.score_text.as_deref(), Some("98.8%"));
    assert!(positive.to_html().contains("#2ecc71"));

    let negative = ResultView::success(
        "hate it",
        &AnalysisResult {
            label: Label::Negative,
            score: 0.5,
        },
    );
    assert_eq!(negative.container_class(), "result negative");
    assert!(negative.to_html().contains("NEGATIVE (50.0%)"));
    assert!(negative.to_html().contains("#e74c3c"));
}

#[test]
fn failures_use_the_error_class() {
    let view = ResultView::failure(&DashboardError::RequestFailed("Text too long".into()));
    assert_eq!(view.container_class(), "result error");
    assert_eq!(view.error_text().as_deref(), Some("Error: Text too long"));

    let view = ResultView::failure(&DashboardError::MalformedResult("no label".into()));
    assert_eq!(
        view.error_text().as_deref(),
        Some("Error: Invalid result format received from server")
    );

    let view = ResultView::failure(&DashboardError::EmptyInput);
    assert_eq!(view.error_text().as_deref(), Some("Error: Please enter some text"));
}

#[test]
fn input_is_escaped() {
    let view = ResultView::success(
        "<script>alert(1)</script>",
        &AnalysisResult {
            label: Label::Positive,
            score: 0.7,
        },
    );
    let html = view.to_html();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}
