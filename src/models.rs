//! Normalized entity shapes consumed by the renderers.
//!
//! Every value here is ephemeral: fetched, normalized, rendered and dropped
//! within one refresh cycle.

use serde::{Deserialize, Serialize};

/// Canonical score-range labels for the distribution chart.
pub const CANONICAL_BINS: [&str; 5] = ["0.5-0.6", "0.6-0.7", "0.7-0.8", "0.8-0.9", "0.9-1.0"];

/// Canonical weekday labels, Sunday first (row order of the heatmap grids).
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const DAYS_PER_WEEK: usize = 7;
pub const HOURS_PER_DAY: usize = 24;

/// A day×hour grid of counts, `grid[day][hour]`.
pub type Grid = Vec<Vec<u64>>;

// ---------------------------------------------------------------------------
// Label / analysis result
// ---------------------------------------------------------------------------

/// Categorical sentiment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Parse the wire form. Only the exact upper-case spellings are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "POSITIVE" => Some(Self::Positive),
            "NEGATIVE" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }

    /// Series name used in chart legends.
    pub fn series_name(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }

    /// Designated hue for this label.
    pub fn color(self) -> &'static str {
        match self {
            Self::Positive => "#2ecc71",
            Self::Negative => "#e74c3c",
        }
    }

    /// Same hue as [`Label::color`] as an `r, g, b` triple for `rgba()` strings.
    pub fn rgb(self) -> &'static str {
        match self {
            Self::Positive => "46, 204, 113",
            Self::Negative => "231, 76, 60",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized classification result. `score` is always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub label: Label,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Aggregate statistics
// ---------------------------------------------------------------------------

/// Number of analyses per label. Missing keys normalize to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
}

impl SentimentCounts {
    pub fn get(&self, label: Label) -> u64 {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
        }
    }

    /// Sum of both labels, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.positive.saturating_add(self.negative)
    }
}

/// Histogram of scores per label over five bins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub bins: Vec<String>,
    pub positive: Vec<u64>,
    pub negative: Vec<u64>,
}

impl Default for ScoreDistribution {
    fn default() -> Self {
        Self {
            bins: canonical_bins(),
            positive: vec![0; CANONICAL_BINS.len()],
            negative: vec![0; CANONICAL_BINS.len()],
        }
    }
}

/// Analyses per hour bucket. All three sequences share one length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeTrend {
    pub hours: Vec<String>,
    pub positive: Vec<u64>,
    pub negative: Vec<u64>,
}

impl TimeTrend {
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// Counts per weekday and hour of day, one grid per label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub days: Vec<String>,
    pub hours: Vec<String>,
    pub positive: Grid,
    pub negative: Grid,
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            days: canonical_days(),
            hours: canonical_hours(),
            positive: zero_grid(),
            negative: zero_grid(),
        }
    }
}

impl Heatmap {
    pub fn grid(&self, label: Label) -> &Grid {
        match label {
            Label::Positive => &self.positive,
            Label::Negative => &self.negative,
        }
    }

    /// Count at `(day, hour)`, zero when out of range.
    pub fn count(&self, label: Label, day: usize, hour: usize) -> u64 {
        self.grid(label)
            .get(day)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }
}

/// Most frequent words per label, highest count first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordFrequencies {
    pub positive: Vec<(String, u64)>,
    pub negative: Vec<(String, u64)>,
}

impl WordFrequencies {
    pub fn for_label(&self, label: Label) -> &[(String, u64)] {
        match label {
            Label::Positive => &self.positive,
            Label::Negative => &self.negative,
        }
    }
}

/// One analysis on the signed sentiment trend: `+score` for positive,
/// `-score` for negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: String,
    pub sentiment: f64,
}

// ---------------------------------------------------------------------------
// Word clouds
// ---------------------------------------------------------------------------

/// Which of the two word-cloud images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordcloudKind {
    Positive,
    Negative,
}

impl WordcloudKind {
    pub const ALL: [WordcloudKind; 2] = [WordcloudKind::Positive, WordcloudKind::Negative];

    /// Endpoint path on the backend.
    pub fn path(self) -> &'static str {
        match self {
            Self::Positive => "/wordcloud/positive",
            Self::Negative => "/wordcloud/negative",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn label(self) -> Label {
        match self {
            Self::Positive => Label::Positive,
            Self::Negative => Label::Negative,
        }
    }

    /// Text shown when the server has no image and no message.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Positive => "No positive word cloud available",
            Self::Negative => "No negative word cloud available",
        }
    }
}

impl std::fmt::Display for WordcloudKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized word-cloud payload. An empty image string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordcloudResponse {
    pub image: Option<String>,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Canonical defaults
// ---------------------------------------------------------------------------

pub fn canonical_bins() -> Vec<String> {
    CANONICAL_BINS.iter().map(|b| b.to_string()).collect()
}

pub fn canonical_days() -> Vec<String> {
    WEEKDAYS.iter().map(|d| d.to_string()).collect()
}

/// `0:00` through `23:00`.
pub fn canonical_hours() -> Vec<String> {
    (0..HOURS_PER_DAY).map(|h| format!("{h}:00")).collect()
}

pub fn zero_grid() -> Grid {
    vec![vec![0; HOURS_PER_DAY]; DAYS_PER_WEEK]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parse_is_exact() {
        assert_eq!(Label::parse("POSITIVE"), Some(Label::Positive));
        assert_eq!(Label::parse("NEGATIVE"), Some(Label::Negative));
        assert_eq!(Label::parse("positive"), None);
        assert_eq!(Label::parse("NEUTRAL"), None);
    }

    #[test]
    fn canonical_hours_cover_the_day() {
        let hours = canonical_hours();
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0], "0:00");
        assert_eq!(hours[23], "23:00");
    }

    #[test]
    fn heatmap_default_is_zeroed_week() {
        let heatmap = Heatmap::default();
        assert_eq!(heatmap.days, canonical_days());
        assert_eq!(heatmap.positive.len(), 7);
        assert!(heatmap.negative.iter().all(|row| row.len() == 24));
        assert_eq!(heatmap.count(Label::Positive, 9, 99), 0);
    }

    #[test]
    fn wordcloud_kind_paths() {
        assert_eq!(WordcloudKind::Positive.path(), "/wordcloud/positive");
        assert_eq!(WordcloudKind::Negative.path(), "/wordcloud/negative");
    }
}
