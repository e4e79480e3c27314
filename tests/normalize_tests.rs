/// Normalization tests.
///
/// Covers how partial or misshapen backend payloads are reshaped into the
/// fixed entity shapes the charts consume.
use serde_json::json;
use sentiview::error::DashboardError;
use sentiview::models::{CANONICAL_BINS, Label, SentimentCounts};
use sentiview::normalize::{analysis_result, stats_snapshot, wordcloud};

// ---------------------------------------------------------------------------
// Sentiment counts
// ---------------------------------------------------------------------------

#[test]
fn counts_missing_negative_defaults_to_zero() {
    let snapshot = stats_snapshot(&json!({"sentiment_counts": {"POSITIVE": 5}}));
    assert_eq!(
        snapshot.sentiment_counts.unwrap(),
        SentimentCounts {
            positive: 5,
            negative: 0
        }
    );
}

#[test]
fn counts_missing_both_keys_default_to_zero() {
    let snapshot = stats_snapshot(&json!({"sentiment_counts": {}}));
    assert_eq!(snapshot.sentiment_counts.unwrap(), SentimentCounts::default());

    let snapshot = stats_snapshot(&json!({}));
    assert_eq!(snapshot.sentiment_counts.unwrap(), SentimentCounts::default());
}

#[test]
fn counts_ignore_unknown_labels_and_negative_values() {
    let snapshot = stats_snapshot(&json!({
        "sentiment_counts": {"POSITIVE": -3, "NEGATIVE": 2.6, "NEUTRAL": 9}
    }));
    assert_eq!(
        snapshot.sentiment_counts.unwrap(),
        SentimentCounts {
            positive: 0,
            negative: 3
        }
    );
}

// ---------------------------------------------------------------------------
// Score distribution
// ---------------------------------------------------------------------------

#[test]
fn distribution_without_series_is_all_zero_over_canonical_bins() {
    let snapshot = stats_snapshot(&json!({"score_distribution": {}}));
    let distribution = snapshot.score_distribution.unwrap();
    assert_eq!(distribution.bins, CANONICAL_BINS.to_vec());
    assert_eq!(distribution.positive, vec![0, 0, 0, 0, 0]);
    assert_eq!(distribution.negative, vec![0, 0, 0, 0, 0]);
}

#[test]
fn distribution_short_series_is_padded() {
    let snapshot = stats_snapshot(&json!({
        "score_distribution": {"positive": [4, 2], "negative": [1, 1, 1, 1, 1, 1, 1]}
    }));
    let distribution = snapshot.score_distribution.unwrap();
    assert_eq!(distribution.positive, vec![4, 2, 0, 0, 0]);
    assert_eq!(distribution.negative, vec![1, 1, 1, 1, 1]);
}

// ---------------------------------------------------------------------------
// Time trend and heatmap
// ---------------------------------------------------------------------------

#[test]
fn time_trend_missing_is_empty_not_an_error() {
    let snapshot = stats_snapshot(&json!({"time_trends": null}));
    let trend = snapshot.time_trends.unwrap();
    assert!(trend.is_empty());
    assert!(trend.positive.is_empty());
}

#[test]
fn time_trend_series_follow_hours() {
    let snapshot = stats_snapshot(&json!({
        "time_trends": {"hours": ["9:00", "10:00", "11:00"], "positive": [1, 2]}
    }));
    let trend = snapshot.time_trends.unwrap();
    assert_eq!(trend.positive, vec![1, 2, 0]);
    assert_eq!(trend.negative, vec![0, 0, 0]);
}

#[test]
fn heatmap_defaults_to_zero_grids_with_canonical_labels() {
    let snapshot = stats_snapshot(&json!({"heatmap": {}}));
    let heatmap = snapshot.heatmap.unwrap();
    assert_eq!(heatmap.days.len(), 7);
    assert_eq!(heatmap.days[0], "Sun");
    assert_eq!(heatmap.hours.len(), 24);
    assert_eq!(heatmap.hours[23], "23:00");
    assert_eq!(heatmap.positive.len(), 7);
    assert!(heatmap.negative.iter().all(|row| row.len() == 24 && row.iter().all(|c| *c == 0)));
}

#[test]
fn ragged_heatmap_grid_is_coerced() {
    let snapshot = stats_snapshot(&json!({
        "heatmap": {"positive": [[1, 2], [], [0, 0, 5]]}
    }));
    let heatmap = snapshot.heatmap.unwrap();
    assert_eq!(heatmap.count(Label::Positive, 0, 1), 2);
    assert_eq!(heatmap.count(Label::Positive, 2, 2), 5);
    assert_eq!(heatmap.count(Label::Positive, 6, 23), 0);
    assert_eq!(heatmap.positive[6].len(), 24);
}

#[test]
fn wrongly_typed_section_fails_alone() {
    let snapshot = stats_snapshot(&json!({
        "sentiment_counts": {"POSITIVE": 1},
        "heatmap": [1, 2, 3],
    }));
    assert!(snapshot.sentiment_counts.is_ok());
    assert!(snapshot.score_distribution.is_ok());
    let error = snapshot.heatmap.unwrap_err();
    assert_eq!(error.section, "heatmap");
    assert_eq!(error.found, "array");
}

// ---------------------------------------------------------------------------
// Word frequencies and recent trend
// ---------------------------------------------------------------------------

#[test]
fn word_frequencies_rank_by_count() {
    let snapshot = stats_snapshot(&json!({
        "word_frequencies": {"positive": {"good": 3, "great": 7, "fine": 3}}
    }));
    let words = snapshot.word_frequencies.for_label(Label::Positive);
    assert_eq!(words[0], ("great".to_string(), 7));
    assert_eq!(words[1], ("fine".to_string(), 3));
    assert_eq!(words[2], ("good".to_string(), 3));
    assert!(snapshot.word_frequencies.for_label(Label::Negative).is_empty());
}

#[test]
fn analyses_drop_incomplete_points() {
    let snapshot = stats_snapshot(&json!({
        "analyses": [
            {"timestamp": "2024-03-01T10:00:00", "sentiment": 0.9},
            {"timestamp": "2024-03-01T10:05:00"},
            {"timestamp": "2024-03-01T10:10:00", "sentiment": -0.7},
        ]
    }));
    let sentiments: Vec<f64> = snapshot.analyses.iter().map(|p| p.sentiment).collect();
    assert_eq!(sentiments, vec![0.9, -0.7]);
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

#[test]
fn flat_result_is_accepted() {
    let result = analysis_result(&json!({
        "result": {"label": "NEGATIVE", "score": 0.62},
        "processed_text": "bad"
    }))
    .unwrap();
    assert_eq!(result.label, Label::Negative);
    assert_eq!(result.score, 0.62);
}

#[test]
fn double_nested_result_unwraps_one_level() {
    let result = analysis_result(&json!({
        "result": {"result": {"label": "POSITIVE", "score": 0.87}}
    }))
    .unwrap();
    assert_eq!(result.label, Label::Positive);
    assert_eq!(result.score, 0.87);
}

#[test]
fn triple_nested_result_is_malformed() {
    let error = analysis_result(&json!({
        "result": {"result": {"result": {"label": "POSITIVE", "score": 0.87}}}
    }))
    .unwrap_err();
    assert!(matches!(error, DashboardError::MalformedResult(_)));
}

#[test]
fn missing_or_unknown_fields_are_malformed() {
    for data in [
        json!({}),
        json!({"result": {"label": "POSITIVE"}}),
        json!({"result": {"label": "POSITIVE", "score": "0.9"}}),
        json!({"result": {"label": "NEUTRAL", "score": 0.5}}),
        json!({"result": {"label": "POSITIVE", "score": 1.5}}),
    ] {
        assert!(
            matches!(analysis_result(&data), Err(DashboardError::MalformedResult(_))),
            "{data} should be malformed"
        );
    }
}

// ---------------------------------------------------------------------------
// Word clouds
// ---------------------------------------------------------------------------

#[test]
fn wordcloud_message_without_image() {
    let response = wordcloud(&json!({"message": "none"}));
    assert_eq!(response.image, None);
    assert_eq!(response.message.as_deref(), Some("none"));
}

#[test]
fn wordcloud_empty_image_counts_as_absent() {
    let response = wordcloud(&json!({"image": ""}));
    assert_eq!(response.image, None);
}
