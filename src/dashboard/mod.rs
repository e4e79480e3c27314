//! Chart refresh controller.
//!
//! [`DashboardState`] is the explicit owner of the four chart instances,
//! the two word-cloud slots and the result region. Nothing is global: the
//! flows below take the state by `&mut` and every refresh replaces the
//! affected instance wholesale, so no series or legend state survives from
//! one refresh to the next.
//!
//! Control flow:
//!
//! - page load → refresh all four charts and both word clouds;
//! - analyze → render the result, then (once the response has been
//!   processed) the same full refresh.
//!
//! Refreshes are sequential and independent; a failure in one region only
//! degrades that region.

pub mod charts;
pub mod tooltip;
pub mod wordcloud;

use std::time::Instant;

use serde::Serialize;

use crate::client::{Backend, prepare_text};
use crate::diagnostics::Diagnostics;
use crate::error::DashboardError;
use crate::models::{
    AnalysisResult, Heatmap, ScoreDistribution, SentimentCounts, TimeTrend, TrendPoint,
    WordFrequencies, WordcloudKind,
};
use crate::normalize::StatsSnapshot;
use crate::render::ResultView;

use charts::{ChartData, ChartInstance, ChartTarget};
use wordcloud::WordcloudSlot;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Outcome of the last refresh of a display region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum SlotStatus {
    /// Never refreshed.
    Empty,
    Ready,
    Failed(String),
    /// The backend did not answer in time or refused the connection.
    Unreachable(String),
}

impl SlotStatus {
    pub fn from_error(error: &DashboardError) -> Self {
        match error {
            DashboardError::Unreachable(detail) => Self::Unreachable(detail.clone()),
            other => Self::Failed(other.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// A chart region and the instance currently drawn in it.
///
/// A failed refresh leaves the previous instance in place and only records
/// the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlot {
    pub target: ChartTarget,
    pub instance: Option<ChartInstance>,
    pub status: SlotStatus,
    /// Instances disposed in this slot so far.
    pub disposed: u64,
}

impl ChartSlot {
    fn new(target: ChartTarget) -> Self {
        Self {
            target,
            instance: None,
            status: SlotStatus::Empty,
            disposed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything the dashboard currently shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub result: ResultView,
    pie: ChartSlot,
    bar: ChartSlot,
    time_series: ChartSlot,
    heatmap: ChartSlot,
    pub positive_cloud: WordcloudSlot,
    pub negative_cloud: WordcloudSlot,
    pub word_frequencies: WordFrequencies,
    pub recent_trend: Vec<TrendPoint>,
    pub last_refresh: Option<String>,
    next_instance_id: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            result: ResultView::default(),
            pie: ChartSlot::new(ChartTarget::Pie),
            bar: ChartSlot::new(ChartTarget::Bar),
            time_series: ChartSlot::new(ChartTarget::TimeSeries),
            heatmap: ChartSlot::new(ChartTarget::Heatmap),
            positive_cloud: WordcloudSlot::new(WordcloudKind::Positive),
            negative_cloud: WordcloudSlot::new(WordcloudKind::Negative),
            word_frequencies: WordFrequencies::default(),
            recent_trend: Vec::new(),
            last_refresh: None,
            next_instance_id: 1,
        }
    }

    pub fn slot(&self, target: ChartTarget) -> &ChartSlot {
        match target {
            ChartTarget::Pie => &self.pie,
            ChartTarget::Bar => &self.bar,
            ChartTarget::TimeSeries => &self.time_series,
            ChartTarget::Heatmap => &self.heatmap,
        }
    }

    fn slot_mut(&mut self, target: ChartTarget) -> &mut ChartSlot {
        match target {
            ChartTarget::Pie => &mut self.pie,
            ChartTarget::Bar => &mut self.bar,
            ChartTarget::TimeSeries => &mut self.time_series,
            ChartTarget::Heatmap => &mut self.heatmap,
        }
    }

    /// The instance currently drawn for `target`, if any.
    pub fn chart(&self, target: ChartTarget) -> Option<&ChartInstance> {
        self.slot(target).instance.as_ref()
    }

    pub fn wordcloud(&self, kind: WordcloudKind) -> &WordcloudSlot {
        match kind {
            WordcloudKind::Positive => &self.positive_cloud,
            WordcloudKind::Negative => &self.negative_cloud,
        }
    }

    pub fn wordcloud_mut(&mut self, kind: WordcloudKind) -> &mut WordcloudSlot {
        match kind {
            WordcloudKind::Positive => &mut self.positive_cloud,
            WordcloudKind::Negative => &mut self.negative_cloud,
        }
    }

    // -- chart refreshes ----------------------------------------------------

    pub fn refresh_pie(&mut self, counts: &SentimentCounts) -> &ChartInstance {
        self.install(charts::pie_data(counts))
    }

    pub fn refresh_bar(&mut self, distribution: &ScoreDistribution) -> &ChartInstance {
        self.install(charts::bar_data(distribution))
    }

    pub fn refresh_time_series(&mut self, trend: &TimeTrend) -> &ChartInstance {
        self.install(charts::time_series_data(trend))
    }

    pub fn refresh_heatmap(&mut self, heatmap: &Heatmap) -> &ChartInstance {
        self.install(charts::heatmap_data(heatmap))
    }

    /// Dispose whatever is drawn for the data's target and draw a new
    /// instance in its place.
    fn install(&mut self, data: ChartData) -> &ChartInstance {
        let id = self.next_instance_id;
        self.next_instance_id += 1;

        let slot = self.slot_mut(data.target());
        if slot.instance.take().is_some() {
            slot.disposed += 1;
        }
        slot.status = SlotStatus::Ready;
        slot.instance.insert(ChartInstance::new(id, data))
    }

    /// Record a failed refresh, keeping the previous instance.
    pub fn mark_failed(&mut self, target: ChartTarget, status: SlotStatus) {
        self.slot_mut(target).status = status;
    }

    /// Redraw every chart from one stats outcome.
    ///
    /// A request failure marks all four regions; a malformed section marks
    /// only its own region.
    pub fn apply_stats(&mut self, outcome: Result<StatsSnapshot, DashboardError>) {
        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(error) => {
                for target in ChartTarget::ALL {
                    self.mark_failed(target, SlotStatus::from_error(&error));
                }
                return;
            }
        };

        match &snapshot.sentiment_counts {
            Ok(counts) => {
                self.refresh_pie(counts);
            }
            Err(e) => self.mark_failed(ChartTarget::Pie, SlotStatus::Failed(e.to_string())),
        }
        match &snapshot.score_distribution {
            Ok(distribution) => {
                self.refresh_bar(distribution);
            }
            Err(e) => self.mark_failed(ChartTarget::Bar, SlotStatus::Failed(e.to_string())),
        }
        match &snapshot.time_trends {
            Ok(trend) => {
                self.refresh_time_series(trend);
            }
            Err(e) => self.mark_failed(ChartTarget::TimeSeries, SlotStatus::Failed(e.to_string())),
        }
        match &snapshot.heatmap {
            Ok(heatmap) => {
                self.refresh_heatmap(heatmap);
            }
            Err(e) => self.mark_failed(ChartTarget::Heatmap, SlotStatus::Failed(e.to_string())),
        }

        self.word_frequencies = snapshot.word_frequencies;
        self.recent_trend = snapshot.analyses;
        self.last_refresh = Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    }
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Page-load refresh: all four charts, then both word clouds.
pub fn page_load<B: Backend + ?Sized>(
    backend: &B,
    state: &mut DashboardState,
    diagnostics: &Diagnostics,
) {
    refresh_stats(backend, state, diagnostics);
    refresh_wordclouds(backend, state, diagnostics);
}

/// Analyze `text`, render the outcome, then refresh the dashboard.
///
/// Blank input is rejected before any request. The refresh runs only after a
/// response has been processed (a result, or a malformed one); a failed
/// request leaves the charts as they are.
pub fn analyze<B: Backend + ?Sized>(
    backend: &B,
    state: &mut DashboardState,
    diagnostics: &Diagnostics,
    text: &str,
) -> Result<AnalysisResult, DashboardError> {
    let text = match prepare_text(text) {
        Ok(text) => text,
        Err(error) => {
            state.result = ResultView::failure(&error);
            return Err(error);
        }
    };

    state.result = ResultView::loading();
    let started = Instant::now();
    let outcome = backend.analyze(text);
    let latency_ms = started.elapsed().as_millis() as u64;

    match &outcome {
        Ok(result) => {
            state.result = ResultView::success(text, result);
            diagnostics.record_ok("analyze", latency_ms);
        }
        Err(error) => {
            state.result = ResultView::failure(error);
            diagnostics.record_failure("analyze", error.kind(), &error.to_string(), latency_ms);
        }
    }

    if matches!(outcome, Ok(_) | Err(DashboardError::MalformedResult(_))) {
        page_load(backend, state, diagnostics);
    }

    outcome
}

/// Fetch `/stats` once and redraw the four charts from it.
pub fn refresh_stats<B: Backend + ?Sized>(
    backend: &B,
    state: &mut DashboardState,
    diagnostics: &Diagnostics,
) {
    let started = Instant::now();
    let outcome = backend.stats();
    let latency_ms = started.elapsed().as_millis() as u64;

    let request_kind = outcome.as_ref().err().map(DashboardError::kind);
    state.apply_stats(outcome);

    for target in ChartTarget::ALL {
        let name = format!("chart:{target}");
        match &state.slot(target).status {
            SlotStatus::Ready => diagnostics.record_ok(&name, latency_ms),
            SlotStatus::Failed(message) | SlotStatus::Unreachable(message) => diagnostics
                .record_failure(
                    &name,
                    request_kind.unwrap_or("malformed_section"),
                    message,
                    latency_ms,
                ),
            SlotStatus::Empty => {}
        }
    }
}

/// Reload both word-cloud slots, one request each.
pub fn refresh_wordclouds<B: Backend + ?Sized>(
    backend: &B,
    state: &mut DashboardState,
    diagnostics: &Diagnostics,
) {
    for kind in WordcloudKind::ALL {
        state.wordcloud_mut(kind).begin_loading();

        let started = Instant::now();
        let outcome = backend.wordcloud(kind);
        let latency_ms = started.elapsed().as_millis() as u64;

        let name = format!("wordcloud:{kind}");
        match &outcome {
            Ok(_) => diagnostics.record_ok(&name, latency_ms),
            Err(error) => {
                diagnostics.record_failure(&name, error.kind(), &error.to_string(), latency_ms)
            }
        }

        state.wordcloud_mut(kind).apply(outcome);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;
    use crate::normalize::stats_snapshot;
    use serde_json::json;

    #[test]
    fn refresh_disposes_previous_instance() {
        let mut state = DashboardState::new();
        let first = state.refresh_pie(&SentimentCounts::default()).id;
        let second = state
            .refresh_pie(&SentimentCounts {
                positive: 1,
                negative: 0,
            })
            .id;

        assert_ne!(first, second);
        let slot = state.slot(ChartTarget::Pie);
        assert_eq!(slot.disposed, 1);
        assert_eq!(slot.instance.as_ref().map(|i| i.id), Some(second));
    }

    #[test]
    fn instance_ids_are_unique_across_targets() {
        let mut state = DashboardState::new();
        let a = state.refresh_bar(&ScoreDistribution::default()).id;
        let b = state.refresh_heatmap(&Heatmap::default()).id;
        assert_ne!(a, b);
    }

    #[test]
    fn request_failure_keeps_previous_charts() {
        let mut state = DashboardState::new();
        state.refresh_pie(&SentimentCounts {
            positive: 4,
            negative: 2,
        });
        state.apply_stats(Err(DashboardError::RequestFailed("db locked".into())));

        let slot = state.slot(ChartTarget::Pie);
        assert_eq!(slot.status, SlotStatus::Failed("db locked".into()));
        assert!(slot.instance.is_some());
        assert_eq!(state.slot(ChartTarget::Heatmap).status, SlotStatus::Failed("db locked".into()));
    }

    #[test]
    fn bad_section_does_not_block_others() {
        let mut state = DashboardState::new();
        state.apply_stats(Ok(stats_snapshot(&json!({
            "sentiment_counts": [1, 2],
            "score_distribution": {"positive": [1, 1, 1, 1, 1]},
        }))));

        assert!(matches!(
            state.slot(ChartTarget::Pie).status,
            SlotStatus::Failed(_)
        ));
        assert!(state.chart(ChartTarget::Pie).is_none());
        for target in [ChartTarget::Bar, ChartTarget::TimeSeries, ChartTarget::Heatmap] {
            assert!(state.slot(target).status.is_ready(), "{target} should refresh");
        }
        let bar = state.chart(ChartTarget::Bar).unwrap();
        assert_eq!(bar.data.series(Label::Positive), Some(&[1, 1, 1, 1, 1][..]));
    }

    #[test]
    fn unreachable_status_is_distinct() {
        let status = SlotStatus::from_error(&DashboardError::Unreachable("timed out".into()));
        assert_eq!(status, SlotStatus::Unreachable("timed out".into()));
    }
}
