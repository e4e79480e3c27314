//! Chart construction.
//!
//! Each builder turns one normalized entity into typed [`ChartData`]; a
//! [`ChartInstance`] wraps that data with an identity and emits the option
//! JSON for the drawing library that owns its target (Chart.js for the pie
//! and bar charts, ECharts for the time series and the heatmap).

use serde::Serialize;
use serde_json::{Value, json};

use super::tooltip::{heatmap_points, heatmap_scale_max, heatmap_tooltip, pie_tooltip};
use crate::models::{Heatmap, Label, ScoreDistribution, SentimentCounts, TimeTrend};

/// Colour ramp of the heatmap visual map, low to high.
const HEATMAP_RAMP: [&str; 5] = ["#e0f3f8", "#abd9e9", "#74add1", "#4575b4", "#313695"];

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// The four chart regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartTarget {
    Pie,
    Bar,
    TimeSeries,
    Heatmap,
}

/// Drawing library responsible for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartLibrary {
    ChartJs,
    ECharts,
}

impl ChartTarget {
    pub const ALL: [ChartTarget; 4] = [
        ChartTarget::Pie,
        ChartTarget::Bar,
        ChartTarget::TimeSeries,
        ChartTarget::Heatmap,
    ];

    /// Id of the element hosting the chart.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Pie => "pieChart",
            Self::Bar => "barChart",
            Self::TimeSeries => "timeChart",
            Self::Heatmap => "heatmap",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Pie => "Sentiment Distribution",
            Self::Bar => "Score Distribution",
            Self::TimeSeries => "Sentiment Over Time",
            Self::Heatmap => "Activity by Day and Hour",
        }
    }

    pub fn library(self) -> ChartLibrary {
        match self {
            Self::Pie | Self::Bar => ChartLibrary::ChartJs,
            Self::TimeSeries | Self::Heatmap => ChartLibrary::ECharts,
        }
    }
}

impl std::fmt::Display for ChartTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::TimeSeries => "time_series",
            Self::Heatmap => "heatmap",
        })
    }
}

// ---------------------------------------------------------------------------
// Typed chart data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: Label,
    pub value: u64,
    pub color: &'static str,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub label: Label,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapPoint {
    pub hour: u64,
    pub day: u64,
    pub count: u64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapLayer {
    pub label: Label,
    pub points: Vec<HeatmapPoint>,
}

/// What a chart shows, independent of the drawing library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Pie {
        slices: Vec<PieSlice>,
    },
    Bar {
        bins: Vec<String>,
        series: Vec<Series>,
    },
    TimeSeries {
        hours: Vec<String>,
        series: Vec<Series>,
    },
    Heatmap {
        days: Vec<String>,
        hours: Vec<String>,
        layers: Vec<HeatmapLayer>,
        scale_max: u64,
    },
}

impl ChartData {
    pub fn target(&self) -> ChartTarget {
        match self {
            Self::Pie { .. } => ChartTarget::Pie,
            Self::Bar { .. } => ChartTarget::Bar,
            Self::TimeSeries { .. } => ChartTarget::TimeSeries,
            Self::Heatmap { .. } => ChartTarget::Heatmap,
        }
    }

    /// Series for `label` on bar and time-series charts.
    pub fn series(&self, label: Label) -> Option<&[u64]> {
        let series = match self {
            Self::Bar { series, .. } | Self::TimeSeries { series, .. } => series,
            _ => return None,
        };
        series
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.data.as_slice())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Two slices, positive first.
pub fn pie_data(counts: &SentimentCounts) -> ChartData {
    let total = counts.total();
    let slices = [Label::Positive, Label::Negative]
        .into_iter()
        .map(|label| {
            let value = counts.get(label);
            PieSlice {
                label,
                value,
                color: label.color(),
                tooltip: pie_tooltip(label, value, total),
            }
        })
        .collect();
    ChartData::Pie { slices }
}

pub fn bar_data(distribution: &ScoreDistribution) -> ChartData {
    ChartData::Bar {
        bins: distribution.bins.clone(),
        series: vec![
            Series {
                label: Label::Positive,
                data: distribution.positive.clone(),
            },
            Series {
                label: Label::Negative,
                data: distribution.negative.clone(),
            },
        ],
    }
}

pub fn time_series_data(trend: &TimeTrend) -> ChartData {
    ChartData::TimeSeries {
        hours: trend.hours.clone(),
        series: vec![
            Series {
                label: Label::Positive,
                data: trend.positive.clone(),
            },
            Series {
                label: Label::Negative,
                data: trend.negative.clone(),
            },
        ],
    }
}

/// Two layers of non-zero cells over the day×hour grid.
pub fn heatmap_data(heatmap: &Heatmap) -> ChartData {
    let layers = [Label::Positive, Label::Negative]
        .into_iter()
        .map(|label| HeatmapLayer {
            label,
            points: heatmap_points(heatmap.grid(label))
                .into_iter()
                .map(|[hour, day, count]| HeatmapPoint {
                    hour,
                    day,
                    count,
                    tooltip: heatmap_tooltip(heatmap, hour as usize, day as usize),
                })
                .collect(),
        })
        .collect();

    ChartData::Heatmap {
        days: heatmap.days.clone(),
        hours: heatmap.hours.clone(),
        layers,
        scale_max: heatmap_scale_max(heatmap),
    }
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

/// Viewport resize hook for charts that must be resized by hand.
///
/// Re-emitted with every new instance; the old binding goes away with the
/// instance it belonged to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeBinding {
    pub element_id: &'static str,
}

/// One constructed chart. Never mutated: a refresh disposes it and builds
/// a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInstance {
    pub id: u64,
    pub target: ChartTarget,
    pub data: ChartData,
    pub resize: Option<ResizeBinding>,
    pub created_at: String,
}

impl ChartInstance {
    pub fn new(id: u64, data: ChartData) -> Self {
        let target = data.target();
        let resize = match target.library() {
            ChartLibrary::ECharts => Some(ResizeBinding {
                element_id: target.element_id(),
            }),
            ChartLibrary::ChartJs => None,
        };

        Self {
            id,
            target,
            data,
            resize,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Library option object for this chart.
    pub fn options(&self) -> Value {
        match &self.data {
            ChartData::Pie { slices } => pie_options(slices),
            ChartData::Bar { bins, series } => bar_options(bins, series),
            ChartData::TimeSeries { hours, series } => time_series_options(hours, series),
            ChartData::Heatmap {
                days,
                hours,
                layers,
                scale_max,
            } => heatmap_options(days, hours, layers, *scale_max),
        }
    }

    /// Everything the page script needs to draw this instance.
    pub fn embed(&self) -> Value {
        let tooltips: Vec<&str> = match &self.data {
            ChartData::Pie { slices } => slices.iter().map(|s| s.tooltip.as_str()).collect(),
            _ => Vec::new(),
        };

        json!({
            "id": self.id,
            "element": self.target.element_id(),
            "library": self.target.library(),
            "options": self.options(),
            "tooltips": tooltips,
            "resize": self.resize.is_some(),
        })
    }
}

// ---------------------------------------------------------------------------
// Library options
// ---------------------------------------------------------------------------

fn pie_options(slices: &[PieSlice]) -> Value {
    json!({
        "type": "pie",
        "data": {
            "labels": slices.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            "datasets": [{
                "data": slices.iter().map(|s| s.value).collect::<Vec<_>>(),
                "backgroundColor": slices.iter().map(|s| s.color).collect::<Vec<_>>(),
                "borderWidth": 1,
            }],
        },
        "options": {
            "responsive": true,
            "plugins": {
                "legend": { "position": "bottom" },
            },
        },
    })
}

fn bar_options(bins: &[String], series: &[Series]) -> Value {
    let datasets: Vec<Value> = series
        .iter()
        .map(|s| {
            json!({
                "label": s.label.series_name(),
                "data": s.data,
                "backgroundColor": format!("rgba({}, 0.7)", s.label.rgb()),
                "borderColor": format!("rgba({}, 1)", s.label.rgb()),
                "borderWidth": 1,
            })
        })
        .collect();

    json!({
        "type": "bar",
        "data": { "labels": bins, "datasets": datasets },
        "options": {
            "responsive": true,
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "title": { "display": true, "text": "Number of Analyses" },
                },
                "x": {
                    "title": { "display": true, "text": "Score Range" },
                },
            },
        },
    })
}

fn time_series_options(hours: &[String], series: &[Series]) -> Value {
    let series: Vec<Value> = series
        .iter()
        .map(|s| {
            json!({
                "name": s.label.series_name(),
                "type": "line",
                "stack": "total",
                "smooth": true,
                "lineStyle": { "width": 0 },
                "showSymbol": false,
                "areaStyle": {
                    "opacity": 0.8,
                    "color": {
                        "type": "linear",
                        "x": 0, "y": 0, "x2": 0, "y2": 1,
                        "colorStops": [
                            { "offset": 0, "color": format!("rgba({}, 0.8)", s.label.rgb()) },
                            { "offset": 1, "color": format!("rgba({}, 0.1)", s.label.rgb()) },
                        ],
                    },
                },
                "emphasis": { "focus": "series" },
                "data": s.data,
            })
        })
        .collect();

    json!({
        "tooltip": { "trigger": "axis", "axisPointer": { "type": "shadow" } },
        "legend": { "data": ["Positive", "Negative"] },
        "grid": { "left": "3%", "right": "4%", "bottom": "3%", "containLabel": true },
        "xAxis": {
            "type": "category",
            "data": hours,
            "axisLabel": { "rotate": 45 },
        },
        "yAxis": { "type": "value", "name": "Number of Analyses" },
        "series": series,
    })
}

fn heatmap_options(days: &[String], hours: &[String], layers: &[HeatmapLayer], max: u64) -> Value {
    let series: Vec<Value> = layers
        .iter()
        .map(|layer| {
            let data: Vec<Value> = layer
                .points
                .iter()
                .map(|p| json!({ "value": [p.hour, p.day, p.count], "tip": p.tooltip }))
                .collect();
            json!({
                "name": layer.label.series_name(),
                "type": "heatmap",
                "data": data,
                "label": { "show": false },
                "emphasis": {
                    "itemStyle": { "shadowBlur": 10, "shadowColor": "rgba(0, 0, 0, 0.5)" },
                },
            })
        })
        .collect();

    json!({
        "tooltip": { "position": "top" },
        "grid": { "top": "15%", "left": "3%", "right": "4%", "bottom": "10%", "containLabel": true },
        "xAxis": {
            "type": "category",
            "data": hours,
            "splitArea": { "show": true },
            "axisLabel": { "interval": 3 },
        },
        "yAxis": { "type": "category", "data": days, "splitArea": { "show": true } },
        "visualMap": {
            "min": 0,
            "max": max,
            "calculable": true,
            "orient": "horizontal",
            "left": "center",
            "bottom": "0%",
            "inRange": { "color": HEATMAP_RAMP },
        },
        "series": series,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_colors_follow_labels() {
        let data = pie_data(&SentimentCounts {
            positive: 3,
            negative: 1,
        });
        let ChartData::Pie { slices } = &data else {
            panic!("expected pie data");
        };
        assert_eq!(slices[0].label, Label::Positive);
        assert_eq!(slices[0].color, "#2ecc71");
        assert_eq!(slices[1].color, "#e74c3c");
        assert_eq!(slices[0].tooltip, "POSITIVE: 3 (75%)");
    }

    #[test]
    fn bar_options_carry_axis_titles() {
        let instance = ChartInstance::new(1, bar_data(&ScoreDistribution::default()));
        let options = instance.options();
        assert_eq!(
            options["options"]["scales"]["y"]["title"]["text"],
            "Number of Analyses"
        );
        assert_eq!(options["options"]["scales"]["x"]["title"]["text"], "Score Range");
        assert_eq!(options["data"]["labels"][4], "0.9-1.0");
        assert!(instance.resize.is_none());
    }

    #[test]
    fn time_series_rotates_labels_and_binds_resize() {
        let trend = TimeTrend {
            hours: vec!["2024-05-01 09".into()],
            positive: vec![2],
            negative: vec![1],
        };
        let instance = ChartInstance::new(7, time_series_data(&trend));
        let options = instance.options();
        assert_eq!(options["xAxis"]["axisLabel"]["rotate"], 45);
        assert_eq!(options["series"][0]["stack"], "total");
        assert_eq!(
            instance.resize,
            Some(ResizeBinding {
                element_id: "timeChart"
            })
        );
    }

    #[test]
    fn heatmap_layers_skip_zero_cells() {
        let mut heatmap = Heatmap::default();
        heatmap.negative[3][12] = 4;
        let data = heatmap_data(&heatmap);
        let ChartData::Heatmap {
            layers, scale_max, ..
        } = &data
        else {
            panic!("expected heatmap data");
        };
        assert!(layers[0].points.is_empty());
        assert_eq!(layers[1].points.len(), 1);
        assert_eq!(layers[1].points[0].tooltip, "Wed at 12:00<br>Positive: 0<br>Negative: 4");
        assert_eq!(*scale_max, 4);

        let options = ChartInstance::new(2, data).options();
        assert_eq!(options["visualMap"]["max"], 4);
        assert_eq!(options["series"][1]["data"][0]["value"], json!([12, 3, 4]));
    }

    #[test]
    fn embed_exposes_pie_tooltips() {
        let instance = ChartInstance::new(3, pie_data(&SentimentCounts::default()));
        let embed = instance.embed();
        assert_eq!(embed["element"], "pieChart");
        assert_eq!(embed["library"], "chartjs");
        assert_eq!(embed["tooltips"], json!(["POSITIVE: 0 (0%)", "NEGATIVE: 0 (0%)"]));
    }
}
