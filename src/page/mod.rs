//! HTML sink for the dashboard.
//!
//! Renders a [`DashboardState`] into one self-contained page. Chart option
//! JSON is embedded in a `<script type="application/json">` block and drawn
//! client-side; everything else (result region, slot states, word clouds)
//! is rendered here.

mod assets;

use serde_json::Value;

use crate::dashboard::charts::ChartTarget;
use crate::dashboard::wordcloud::WordcloudSlot;
use crate::dashboard::{DashboardState, SlotStatus};
use crate::models::WordcloudKind;
use crate::render::escape_html;

/// Page-level settings that are not part of the dashboard model.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Shown in the header.
    pub backend_url: String,
    /// Whether the analyze form is live (served) or a static snapshot.
    pub interactive: bool,
    /// Words listed under each word cloud.
    pub top_words: usize,
}

/// Render the full dashboard page.
pub fn render_page(state: &DashboardState, ctx: &PageContext) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Sentiment Dashboard</title>\n");
    html.push_str(&format!("<style>{}</style>\n", assets::STYLE));
    html.push_str(&format!("<script src=\"{}\"></script>\n", assets::CHART_JS_CDN));
    html.push_str(&format!("<script src=\"{}\"></script>\n", assets::ECHARTS_CDN));
    html.push_str("</head>\n<body>\n<div class=\"app\">\n");

    html.push_str(&format!(
        "<header><h1>Sentiment Dashboard</h1><span class=\"subtitle\">backend {}{}</span></header>\n",
        escape_html(&ctx.backend_url),
        state
            .last_refresh
            .as_deref()
            .map(|t| format!(" · refreshed {}", escape_html(t)))
            .unwrap_or_default(),
    ));

    render_input(&mut html, state, ctx);

    html.push_str("<div class=\"grid\">\n");
    for target in ChartTarget::ALL {
        render_chart_card(&mut html, state, target);
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"grid\">\n");
    for kind in WordcloudKind::ALL {
        render_wordcloud_card(&mut html, state, kind, ctx.top_words);
    }
    html.push_str("</div>\n");

    html.push_str("</div>\n");
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"dashboard-charts\">{}</script>\n",
        chart_embeds_json(state)
    ));
    html.push_str(&format!("<script>{}</script>\n", assets::SCRIPT));
    html.push_str("</body>\n</html>\n");

    html
}

/// Embedded chart descriptions, safe to place inside a `<script>` element.
pub fn chart_embeds_json(state: &DashboardState) -> String {
    let embeds: Vec<Value> = ChartTarget::ALL
        .into_iter()
        .filter_map(|target| state.chart(target))
        .map(|instance| instance.embed())
        .collect();

    Value::Array(embeds).to_string().replace("</", "<\\/")
}

fn render_input(html: &mut String, state: &DashboardState, ctx: &PageContext) {
    html.push_str("<section class=\"card\">\n<h2>Analyze Text</h2>\n");
    if ctx.interactive {
        html.push_str(
            "<textarea id=\"textInput\" placeholder=\"Enter text to analyze...\"></textarea>\n",
        );
        html.push_str("<button type=\"button\" onclick=\"analyzeText()\">Analyze</button>\n");
    } else {
        html.push_str("<p class=\"loading\">Static snapshot: run <code>sentiview serve</code> to analyze text.</p>\n");
    }
    html.push_str(&format!(
        "<div id=\"result\" class=\"{}\">{}</div>\n",
        state.result.container_class(),
        state.result.to_html()
    ));
    html.push_str("</section>\n");
}

fn render_chart_card(html: &mut String, state: &DashboardState, target: ChartTarget) {
    let slot = state.slot(target);
    html.push_str(&format!(
        "<section class=\"card\">\n<h2>{}</h2>\n",
        target.title()
    ));

    if let Some((class, text)) = status_banner(&slot.status) {
        html.push_str(&format!(
            "<div class=\"slot-status {class}\">{}</div>\n",
            escape_html(&text)
        ));
    }

    // Chart.js sizes a canvas from its wrapper; ECharts draws into the host div itself.
    let host = match target {
        ChartTarget::Pie | ChartTarget::Bar => format!(
            "<div class=\"chart-host\"><canvas id=\"{}\"></canvas></div>",
            target.element_id()
        ),
        ChartTarget::TimeSeries | ChartTarget::Heatmap => {
            format!("<div id=\"{}\" class=\"chart-host\"></div>", target.element_id())
        }
    };
    html.push_str(&format!("{host}\n</section>\n"));
}

fn status_banner(status: &SlotStatus) -> Option<(&'static str, String)> {
    match status {
        SlotStatus::Empty => Some(("empty", "No data loaded yet".to_string())),
        SlotStatus::Ready => None,
        SlotStatus::Failed(message) => Some(("failed", format!("Refresh failed: {message}"))),
        SlotStatus::Unreachable(_) => Some((
            "unreachable",
            "Statistics service unreachable; showing last loaded data".to_string(),
        )),
    }
}

fn render_wordcloud_card(html: &mut String, state: &DashboardState, kind: WordcloudKind, top: usize) {
    let slot: &WordcloudSlot = state.wordcloud(kind);
    let title = match kind {
        WordcloudKind::Positive => "Positive Word Cloud",
        WordcloudKind::Negative => "Negative Word Cloud",
    };
    let id = kind.as_str();

    html.push_str(&format!(
        "<section class=\"card wordcloud\">\n<h2>{title}</h2>\n"
    ));
    html.push_str(&format!(
        "<div id=\"{id}WordcloudLoading\" class=\"loading{}\">{}</div>\n",
        if slot.loading_visible { "" } else { " hidden" },
        escape_html(&slot.loading_text)
    ));
    html.push_str(&format!(
        "<img id=\"{id}Wordcloud\" alt=\"{title}\" class=\"{}\" src=\"{}\">\n",
        if slot.image_visible { "" } else { "hidden" },
        escape_html(slot.image_src.as_deref().unwrap_or_default())
    ));

    let words = state.word_frequencies.for_label(kind.label());
    if !words.is_empty() {
        let list: Vec<String> = words
            .iter()
            .take(top)
            .map(|(word, count)| format!("{} ({count})", escape_html(word)))
            .collect();
        html.push_str(&format!("<div class=\"words\">{}</div>\n", list.join(", ")));
    }

    html.push_str("</section>\n");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
