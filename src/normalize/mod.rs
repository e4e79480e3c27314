//! Response normalization.
//!
//! Reshapes possibly partial or misshapen backend payloads into the fixed
//! entity shapes of [`crate::models`]. Absent fields take documented
//! defaults; only a stats section of the wrong JSON type is an error, and it
//! fails that section alone.

use serde_json::{Map, Value};

use crate::error::DashboardError;
use crate::models::{
    AnalysisResult, DAYS_PER_WEEK, Grid, HOURS_PER_DAY, Heatmap, Label, ScoreDistribution,
    SentimentCounts, TimeTrend, TrendPoint, WordFrequencies, WordcloudResponse, canonical_bins,
    canonical_days, canonical_hours,
};

// ---------------------------------------------------------------------------
// Section errors
// ---------------------------------------------------------------------------

/// A stats section that was present but not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionError {
    pub section: &'static str,
    pub found: &'static str,
}

impl std::fmt::Display for SectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stats section `{}` has unexpected type {}",
            self.section, self.found
        )
    }
}

impl std::error::Error for SectionError {}

/// Every section of one `/stats` payload, normalized independently.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub sentiment_counts: Result<SentimentCounts, SectionError>,
    pub score_distribution: Result<ScoreDistribution, SectionError>,
    pub time_trends: Result<TimeTrend, SectionError>,
    pub heatmap: Result<Heatmap, SectionError>,
    pub word_frequencies: WordFrequencies,
    pub analyses: Vec<TrendPoint>,
}

/// Normalize the `data` payload of a successful `/stats` response.
pub fn stats_snapshot(data: &Value) -> StatsSnapshot {
    StatsSnapshot {
        sentiment_counts: section(data, "sentiment_counts").map(sentiment_counts),
        score_distribution: section(data, "score_distribution").map(score_distribution),
        time_trends: section(data, "time_trends").map(time_trend),
        heatmap: section(data, "heatmap").map(heatmap),
        word_frequencies: section(data, "word_frequencies")
            .map(word_frequencies)
            .unwrap_or_default(),
        analyses: data
            .get("analyses")
            .map(analyses)
            .unwrap_or_default(),
    }
}

/// Look up a stats section. Absent or `null` yields an empty object so that
/// every field falls back to its default.
fn section(data: &Value, name: &'static str) -> Result<Map<String, Value>, SectionError> {
    let value = match data {
        Value::Null => return Ok(Map::new()),
        Value::Object(map) => map.get(name).unwrap_or(&Value::Null),
        other => {
            return Err(SectionError {
                section: name,
                found: type_name(other),
            });
        }
    };

    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        other => Err(SectionError {
            section: name,
            found: type_name(other),
        }),
    }
}

// ---------------------------------------------------------------------------
// Per-entity normalization
// ---------------------------------------------------------------------------

/// `{POSITIVE: n, NEGATIVE: m}` with missing keys defaulting to zero.
/// Unknown keys are ignored.
pub fn sentiment_counts(map: Map<String, Value>) -> SentimentCounts {
    SentimentCounts {
        positive: map.get(Label::Positive.as_str()).map_or(0, count),
        negative: map.get(Label::Negative.as_str()).map_or(0, count),
    }
}

/// Five bins with two aligned series. Series are zero-padded or cut to the
/// bin count.
pub fn score_distribution(map: Map<String, Value>) -> ScoreDistribution {
    let bins = map
        .get("bins")
        .and_then(labels)
        .unwrap_or_else(canonical_bins);
    let len = bins.len();

    ScoreDistribution {
        positive: aligned(map.get("positive"), len),
        negative: aligned(map.get("negative"), len),
        bins,
    }
}

/// Hour buckets with two aligned series. Missing arrays are empty.
pub fn time_trend(map: Map<String, Value>) -> TimeTrend {
    let hours = map.get("hours").and_then(labels).unwrap_or_default();
    let len = hours.len();

    TimeTrend {
        positive: aligned(map.get("positive"), len),
        negative: aligned(map.get("negative"), len),
        hours,
    }
}

/// Day×hour grids coerced to 7×24, with canonical labels when absent.
pub fn heatmap(map: Map<String, Value>) -> Heatmap {
    Heatmap {
        days: map.get("days").and_then(labels).unwrap_or_else(canonical_days),
        hours: map
            .get("hours")
            .and_then(labels)
            .unwrap_or_else(canonical_hours),
        positive: grid(map.get("positive")),
        negative: grid(map.get("negative")),
    }
}

/// `{positive: {word: n}, negative: {word: n}}`, each sorted by count
/// descending then word ascending.
pub fn word_frequencies(map: Map<String, Value>) -> WordFrequencies {
    WordFrequencies {
        positive: ranked_words(map.get("positive")),
        negative: ranked_words(map.get("negative")),
    }
}

/// `[{timestamp, sentiment}]`; entries without both fields are dropped.
pub fn analyses(value: &Value) -> Vec<TrendPoint> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let timestamp = item.get("timestamp")?.as_str()?.to_string();
            let sentiment = item.get("sentiment")?.as_f64()?;
            Some(TrendPoint {
                timestamp,
                sentiment,
            })
        })
        .collect()
}

/// `{image?, message?}`. An empty or non-string image counts as absent.
pub fn wordcloud(data: &Value) -> WordcloudResponse {
    let image = data
        .get("image")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    WordcloudResponse { image, message }
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// Extract the classification from an `/analyze` payload.
///
/// Expects `data.result = {label, score}`. When that object lacks the shape
/// but holds a nested `result` object, exactly one level is unwrapped.
/// Anything deeper is rejected.
pub fn analysis_result(data: &Value) -> Result<AnalysisResult, DashboardError> {
    let outer = data
        .get("result")
        .filter(|r| r.is_object())
        .ok_or_else(|| DashboardError::MalformedResult("response carries no result".into()))?;

    let candidate = if has_result_shape(outer) {
        outer
    } else {
        outer
            .get("result")
            .filter(|inner| inner.is_object())
            .ok_or_else(|| {
                DashboardError::MalformedResult("result lacks label or score".into())
            })?
    };

    if !has_result_shape(candidate) {
        return Err(DashboardError::MalformedResult(
            "nested result lacks label or score".into(),
        ));
    }

    let raw_label = candidate["label"].as_str().unwrap_or_default();
    let label = Label::parse(raw_label)
        .ok_or_else(|| DashboardError::MalformedResult(format!("unknown label `{raw_label}`")))?;

    let score = candidate["score"].as_f64().unwrap_or(f64::NAN);
    if !(0.0..=1.0).contains(&score) {
        return Err(DashboardError::MalformedResult(format!(
            "score {score} outside [0, 1]"
        )));
    }

    Ok(AnalysisResult { label, score })
}

fn has_result_shape(value: &Value) -> bool {
    value.get("label").is_some_and(Value::is_string)
        && value.get("score").is_some_and(Value::is_number)
}

// ---------------------------------------------------------------------------
// Primitive coercions
// ---------------------------------------------------------------------------

/// Non-negative integer count. Floats are rounded, everything else is zero.
fn count(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f.round() as u64,
        _ => 0,
    }
}

/// Sequence of display labels. Numbers are accepted and stringified.
fn labels(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

/// Count series zero-padded or truncated to `len`. Missing means all zeros.
fn aligned(value: Option<&Value>, len: usize) -> Vec<u64> {
    let mut series: Vec<u64> = value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(count).collect())
        .unwrap_or_default();
    series.resize(len, 0);
    series
}

fn grid(value: Option<&Value>) -> Grid {
    let rows = value.and_then(Value::as_array);
    (0..DAYS_PER_WEEK)
        .map(|day| aligned(rows.and_then(|r| r.get(day)), HOURS_PER_DAY))
        .collect()
}

fn ranked_words(value: Option<&Value>) -> Vec<(String, u64)> {
    let Some(map) = value.and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut words: Vec<(String, u64)> = map
        .iter()
        .map(|(word, n)| (word.clone(), count(n)))
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn counts_default_missing_keys() {
        let counts = sentiment_counts(object(json!({"POSITIVE": 5})));
        assert_eq!(counts, SentimentCounts { positive: 5, negative: 0 });
    }

    #[test]
    fn counts_ignore_unknown_keys_and_bad_values() {
        let counts = sentiment_counts(object(json!({"0.98": 3, "NEGATIVE": "many"})));
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn count_rounds_floats_and_clamps_negatives() {
        assert_eq!(count(&json!(2.6)), 3);
        assert_eq!(count(&json!(-4)), 0);
        assert_eq!(count(&json!(null)), 0);
    }

    #[test]
    fn score_distribution_pads_short_series() {
        let dist = score_distribution(object(json!({"positive": [1, 2]})));
        assert_eq!(dist.positive, vec![1, 2, 0, 0, 0]);
        assert_eq!(dist.negative, vec![0; 5]);
    }

    #[test]
    fn time_trend_aligns_to_hours() {
        let trend = time_trend(object(json!({
            "hours": ["2024-01-01 10", "2024-01-01 11"],
            "positive": [3, 1, 9],
        })));
        assert_eq!(trend.positive, vec![3, 1]);
        assert_eq!(trend.negative, vec![0, 0]);
    }

    #[test]
    fn time_trend_missing_is_empty() {
        let trend = time_trend(Map::new());
        assert!(trend.is_empty());
        assert!(trend.positive.is_empty());
    }

    #[test]
    fn heatmap_coerces_ragged_grid() {
        let heatmap = heatmap(object(json!({"positive": [[1, 2], [], [0, 0, 7]]})));
        assert_eq!(heatmap.positive.len(), 7);
        assert!(heatmap.positive.iter().all(|row| row.len() == 24));
        assert_eq!(heatmap.positive[0][1], 2);
        assert_eq!(heatmap.positive[2][2], 7);
        assert_eq!(heatmap.hours, canonical_hours());
    }

    #[test]
    fn wrong_section_type_fails_only_that_section() {
        let snapshot = stats_snapshot(&json!({
            "sentiment_counts": {"POSITIVE": 2},
            "heatmap": "broken",
        }));
        assert_eq!(snapshot.sentiment_counts.unwrap().positive, 2);
        assert!(snapshot.score_distribution.is_ok());
        assert!(snapshot.time_trends.is_ok());
        let err = snapshot.heatmap.unwrap_err();
        assert_eq!(err.section, "heatmap");
        assert_eq!(err.found, "string");
    }

    #[test]
    fn null_payload_defaults_everything() {
        let snapshot = stats_snapshot(&Value::Null);
        assert_eq!(snapshot.sentiment_counts.unwrap().total(), 0);
        assert_eq!(snapshot.heatmap.unwrap(), Heatmap::default());
    }

    #[test]
    fn word_frequencies_rank_by_count() {
        let freq = word_frequencies(object(json!({
            "positive": {"great": 2, "love": 5, "app": 2},
        })));
        let words: Vec<&str> = freq.positive.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["love", "app", "great"]);
        assert!(freq.negative.is_empty());
    }

    #[test]
    fn analyses_skip_incomplete_entries() {
        let points = analyses(&json!([
            {"timestamp": "2024-01-01 10:00:00", "sentiment": -0.9},
            {"timestamp": "2024-01-01 10:05:00"},
        ]));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].sentiment, -0.9);
    }

    #[test]
    fn flat_result_is_accepted() {
        let result = analysis_result(&json!({"result": {"label": "NEGATIVE", "score": 0.61}}))
            .unwrap();
        assert_eq!(result.label, Label::Negative);
        assert_eq!(result.score, 0.61);
    }

    #[test]
    fn nested_result_is_unwrapped_once() {
        let data = json!({"result": {"result": {"label": "POSITIVE", "score": 0.87}}});
        let result = analysis_result(&data).unwrap();
        assert_eq!(result, AnalysisResult { label: Label::Positive, score: 0.87 });
    }

    #[test]
    fn doubly_nested_result_is_malformed() {
        let data = json!({"result": {"result": {"result": {"label": "POSITIVE", "score": 0.87}}}});
        assert!(matches!(
            analysis_result(&data),
            Err(DashboardError::MalformedResult(_))
        ));
    }

    #[test]
    fn unknown_label_is_malformed() {
        let data = json!({"result": {"label": "NEUTRAL", "score": 0.5}});
        assert!(matches!(
            analysis_result(&data),
            Err(DashboardError::MalformedResult(_))
        ));
    }

    #[test]
    fn string_score_is_malformed() {
        let data = json!({"result": {"label": "POSITIVE", "score": "0.9"}});
        assert!(matches!(
            analysis_result(&data),
            Err(DashboardError::MalformedResult(_))
        ));
    }

    #[test]
    fn missing_result_is_malformed() {
        assert!(matches!(
            analysis_result(&json!({"processed_text": "hi"})),
            Err(DashboardError::MalformedResult(_))
        ));
    }

    #[test]
    fn wordcloud_empty_image_is_absent() {
        let wc = wordcloud(&json!({"image": "", "message": "none"}));
        assert_eq!(wc.image, None);
        assert_eq!(wc.message.as_deref(), Some("none"));
    }
}
