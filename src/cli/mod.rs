//! CLI command implementations for sentiview.
//!
//! Provides subcommand handlers for:
//! - `sentiview analyze <text>` — classify text, then refresh the dashboard
//! - `sentiview stats` — aggregate statistics as tables or JSON
//! - `sentiview wordcloud` — word-cloud availability per label
//! - `sentiview snapshot` — render the dashboard to a static HTML file
//! - `sentiview serve` — run the local dashboard server
//! - `sentiview health` — check config, backend, diagnostic log
//! - `sentiview config show|init|set|reset` — configuration management

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Value, json};

use crate::client::{Backend, DashboardClient};
use crate::config::{self, SentiviewConfig};
use crate::dashboard::charts::ChartTarget;
use crate::dashboard::tooltip::pie_percentage;
use crate::dashboard::{self, DashboardState, SlotStatus};
use crate::diagnostics::{self, Diagnostics};
use crate::models::{Heatmap, Label, ScoreDistribution, SentimentCounts, TimeTrend, WordcloudKind};
use crate::normalize::{SectionError, StatsSnapshot};
use crate::page::{PageContext, render_page};
use crate::render::{ResultClass, ResultView};
use crate::web;

/// Output format for the stats command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Word-cloud kinds selected by `positive`, `negative` or `both`.
pub fn wordcloud_kinds(which: &str) -> Vec<WordcloudKind> {
    match which {
        "positive" => vec![WordcloudKind::Positive],
        "negative" => vec![WordcloudKind::Negative],
        _ => WordcloudKind::ALL.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// sentiview analyze
// ---------------------------------------------------------------------------

/// Classify `text` and print the result, then a summary of the refreshed
/// charts.
pub fn run_analyze(config: &SentiviewConfig, text: &str) -> Result<()> {
    let client = DashboardClient::from_config(&config.backend);
    let diagnostics = Diagnostics::from_config(&config.logging);
    let mut state = DashboardState::new();

    let outcome = dashboard::analyze(&client, &mut state, &diagnostics, text);
    print_result(&state.result);

    if state.last_refresh.is_some() {
        println!();
        print_chart_summary(&state);
    }

    match outcome {
        Ok(_) => Ok(()),
        Err(error) => anyhow::bail!(error.user_message()),
    }
}

/// Print a successful classification. Failures are reported once, by the
/// caller's error.
fn print_result(view: &ResultView) {
    if !matches!(view.class, ResultClass::Positive | ResultClass::Negative) {
        return;
    }

    let label = view.label.unwrap_or(Label::Positive);
    let colored_label = match label {
        Label::Positive => label.as_str().green().bold(),
        Label::Negative => label.as_str().red().bold(),
    };
    println!("{}", "Analysis Result".bold().cyan());
    println!(
        "  {} \"{}\"",
        "Text:     ".bold(),
        view.excerpt.as_deref().unwrap_or_default()
    );
    println!(
        "  {} {} ({})",
        "Sentiment:".bold(),
        colored_label,
        view.score_text.as_deref().unwrap_or_default()
    );
}

fn print_chart_summary(state: &DashboardState) {
    println!("{}", "Dashboard refreshed".bold().cyan());
    for target in ChartTarget::ALL {
        let slot = state.slot(target);
        let detail = match &slot.status {
            SlotStatus::Ready => "updated".to_string(),
            SlotStatus::Empty => "not loaded".to_string(),
            SlotStatus::Failed(message) => format!("failed: {message}"),
            SlotStatus::Unreachable(detail) => format!("unreachable: {detail}"),
        };
        print_health_item(target.title(), slot.status.is_ready(), &detail);
    }
    for kind in WordcloudKind::ALL {
        let slot = state.wordcloud(kind);
        let detail = if slot.image_visible {
            "image loaded".to_string()
        } else {
            slot.loading_text.clone()
        };
        print_health_item(
            &format!("{} word cloud", capitalize(kind.as_str())),
            slot.status.is_ready(),
            &detail,
        );
    }
}

// ---------------------------------------------------------------------------
// sentiview stats
// ---------------------------------------------------------------------------

/// Show the aggregate statistics behind the dashboard charts.
pub fn run_stats(config: &SentiviewConfig, format: OutputFormat) -> Result<()> {
    let client = DashboardClient::from_config(&config.backend);
    let snapshot = client
        .stats()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats_json(&snapshot))?);
        }
        OutputFormat::Table => print_stats_table(&snapshot, config),
    }

    Ok(())
}

/// JSON view of a snapshot; a malformed section becomes `{"error": ...}`.
pub fn stats_json(snapshot: &StatsSnapshot) -> Value {
    fn section<T: serde::Serialize>(value: &Result<T, SectionError>) -> Value {
        match value {
            Ok(v) => serde_json::to_value(v).unwrap_or(Value::Null),
            Err(e) => json!({ "error": e.to_string() }),
        }
    }

    json!({
        "sentiment_counts": section(&snapshot.sentiment_counts),
        "score_distribution": section(&snapshot.score_distribution),
        "time_trends": section(&snapshot.time_trends),
        "heatmap": section(&snapshot.heatmap),
        "word_frequencies": snapshot.word_frequencies,
        "analyses": snapshot.analyses,
    })
}

fn print_stats_table(snapshot: &StatsSnapshot, config: &SentiviewConfig) {
    println!("{}", "Sentiment Statistics".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    match &snapshot.sentiment_counts {
        Ok(counts) => print_counts(counts),
        Err(e) => print_section_error(e),
    }
    println!();

    match &snapshot.score_distribution {
        Ok(distribution) => print_distribution(distribution),
        Err(e) => print_section_error(e),
    }
    println!();

    match &snapshot.time_trends {
        Ok(trend) => print_time_trend(trend),
        Err(e) => print_section_error(e),
    }
    println!();

    match &snapshot.heatmap {
        Ok(heatmap) => print_heatmap_peaks(heatmap, 5),
        Err(e) => print_section_error(e),
    }

    let top = config.display.top_words;
    for label in [Label::Positive, Label::Negative] {
        let words = snapshot.word_frequencies.for_label(label);
        if words.is_empty() {
            continue;
        }
        println!();
        println!("{}", format!("Top {} Words", label.series_name()).bold().cyan());
        for (word, count) in words.iter().take(top) {
            println!("  {:<20} {:>8}", truncate(word, 20), format_number(*count));
        }
    }

    if !snapshot.analyses.is_empty() {
        println!();
        println!("{}", "Recent Sentiment Trend".bold().cyan());
        let skip = snapshot.analyses.len().saturating_sub(config.display.trend_points);
        for point in snapshot.analyses.iter().skip(skip) {
            let value = format!("{:+.3}", point.sentiment);
            let value = if point.sentiment >= 0.0 {
                value.green()
            } else {
                value.red()
            };
            println!("  {:<25} {}", point.timestamp, value);
        }
    }
}

fn print_counts(counts: &SentimentCounts) {
    let total = counts.total();
    println!("{}", "Sentiment Distribution".bold().cyan());
    println!("  {} {}", "Total analyses:".bold(), format_number(total));
    println!(
        "  {} {} ({}%)   {} {} ({}%)",
        "Positive:".green(),
        format_number(counts.positive),
        pie_percentage(counts.positive, total),
        "Negative:".red(),
        format_number(counts.negative),
        pie_percentage(counts.negative, total),
    );
}

fn print_distribution(distribution: &ScoreDistribution) {
    println!("{}", "Confidence Score Distribution".bold().cyan());
    println!("  {:<10} {:>10} {:>10}", "Score", "Positive", "Negative");
    println!("  {}", "-".repeat(32));
    for (i, bin) in distribution.bins.iter().enumerate() {
        println!(
            "  {:<10} {:>10} {:>10}",
            bin,
            format_number(distribution.positive.get(i).copied().unwrap_or(0)),
            format_number(distribution.negative.get(i).copied().unwrap_or(0)),
        );
    }
}

fn print_time_trend(trend: &TimeTrend) {
    println!("{}", "Analyses by Hour".bold().cyan());
    if trend.is_empty() {
        println!("  {}", "no hourly data".dimmed());
        return;
    }

    let peak = trend
        .positive
        .iter()
        .zip(&trend.negative)
        .map(|(p, n)| p.saturating_add(*n))
        .max()
        .unwrap_or(0)
        .max(1);

    for (i, hour) in trend.hours.iter().enumerate() {
        let p = trend.positive.get(i).copied().unwrap_or(0);
        let n = trend.negative.get(i).copied().unwrap_or(0);
        let sum = p.saturating_add(n);
        if sum == 0 {
            continue;
        }
        let (positive_width, negative_width) = trend_bar_widths(p, n, peak);
        println!(
            "  {:>6} {}{} {}",
            hour,
            "█".repeat(positive_width).green(),
            "█".repeat(negative_width).red(),
            format_number(sum).dimmed(),
        );
    }
}

const TREND_BAR_WIDTH: u128 = 30;

/// Positive and negative glyph counts of one hourly bar, scaled so `peak`
/// fills `TREND_BAR_WIDTH` glyphs.
fn trend_bar_widths(p: u64, n: u64, peak: u64) -> (usize, usize) {
    let sum = u128::from(p.saturating_add(n));
    if sum == 0 {
        return (0, 0);
    }
    let width = (sum * TREND_BAR_WIDTH / u128::from(peak.max(1))).min(TREND_BAR_WIDTH);
    let positive = width * u128::from(p).min(sum) / sum;
    (positive as usize, (width - positive) as usize)
}

/// Busiest `(day, hour)` cells of the heatmap, both labels combined.
pub fn heatmap_peaks(heatmap: &Heatmap, limit: usize) -> Vec<(String, String, u64, u64)> {
    let mut cells = Vec::new();
    for (d, day) in heatmap.days.iter().enumerate() {
        for (h, hour) in heatmap.hours.iter().enumerate() {
            let p = heatmap.count(Label::Positive, d, h);
            let n = heatmap.count(Label::Negative, d, h);
            if p.saturating_add(n) > 0 {
                cells.push((day.clone(), hour.clone(), p, n));
            }
        }
    }
    cells.sort_by(|a, b| b.2.saturating_add(b.3).cmp(&a.2.saturating_add(a.3)));
    cells.truncate(limit);
    cells
}

fn print_heatmap_peaks(heatmap: &Heatmap, limit: usize) {
    println!("{}", "Busiest Times".bold().cyan());
    let peaks = heatmap_peaks(heatmap, limit);
    if peaks.is_empty() {
        println!("  {}", "no activity recorded".dimmed());
        return;
    }
    for (day, hour, p, n) in peaks {
        println!(
            "  {:<4} {:>6}   {} {}  {} {}",
            day,
            hour,
            "+".green(),
            format_number(p),
            "-".red(),
            format_number(n)
        );
    }
}

fn print_section_error(error: &SectionError) {
    println!("  {} {}", "⚠".yellow(), error.to_string().yellow());
}

// ---------------------------------------------------------------------------
// sentiview wordcloud
// ---------------------------------------------------------------------------

/// Report what each requested word-cloud slot would show.
pub fn run_wordcloud(config: &SentiviewConfig, which: &str) -> Result<()> {
    let client = DashboardClient::from_config(&config.backend);
    let diagnostics = Diagnostics::from_config(&config.logging);
    let mut state = DashboardState::new();

    println!("{}", "Word Clouds".bold().cyan());
    for kind in wordcloud_kinds(which) {
        let slot = state.wordcloud_mut(kind);
        slot.begin_loading();
        let outcome = client.wordcloud(kind);
        if let Err(error) = &outcome {
            diagnostics.record_failure(
                &format!("wordcloud:{kind}"),
                error.kind(),
                &error.to_string(),
                0,
            );
        }
        slot.apply(outcome);

        let name = format!("{} word cloud", capitalize(kind.as_str()));
        match slot.image_info() {
            Some(info) => {
                let detail = format!(
                    "{} ({}, ~{} bytes)",
                    info.mime.as_deref().unwrap_or("url"),
                    if info.base64 { "base64" } else { "plain" },
                    format_number(info.approx_bytes() as u64),
                );
                print_health_item(&name, true, &detail);
            }
            None => print_health_item(&name, slot.status.is_ready(), &slot.loading_text),
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// sentiview snapshot
// ---------------------------------------------------------------------------

/// Refresh the dashboard once and write it as a static HTML page.
pub fn run_snapshot(config: &SentiviewConfig, out: Option<&Path>) -> Result<()> {
    let client = DashboardClient::from_config(&config.backend);
    let diagnostics = Diagnostics::from_config(&config.logging);
    let mut state = DashboardState::new();
    dashboard::page_load(&client, &mut state, &diagnostics);

    let page = PageContext {
        backend_url: client.base_url().to_string(),
        interactive: false,
        top_words: config.display.top_words,
    };
    let html = render_page(&state, &page);

    match out {
        Some(path) => {
            fs::write(path, html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} Dashboard written to {}",
                "✓".green().bold(),
                path.display()
            );
        }
        None => print!("{html}"),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// sentiview serve
// ---------------------------------------------------------------------------

pub fn run_serve(config: &SentiviewConfig, addr: Option<&str>) -> Result<()> {
    web::serve(config, addr.unwrap_or(&config.web.addr))
}

// ---------------------------------------------------------------------------
// sentiview health
// ---------------------------------------------------------------------------

pub fn run_health(config: &SentiviewConfig) -> Result<()> {
    println!("{}", "sentiview Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.sentiview/config.toml found"
        } else {
            "not found (run `sentiview config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".sentiview.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = DashboardClient::from_config(&config.backend);
    let healthy = client.is_healthy();
    print_health_item(
        "Backend",
        healthy,
        &if healthy {
            format!("reachable at {}", client.base_url())
        } else {
            format!("not reachable at {}", client.base_url())
        },
    );
    print_health_item(
        "Timeout",
        true,
        &format!("{} ms", config.backend.timeout_ms),
    );

    let log_path = Diagnostics::from_config(&config.logging)
        .log_path()
        .map(Path::to_path_buf);
    match log_path {
        None => print_health_item("Diagnostic log", true, "disabled"),
        Some(path) => {
            let recent = diagnostics::read_recent(&path, 50);
            let failures: Vec<_> = recent.iter().filter(|e| e.is_failure()).collect();
            print_health_item(
                "Diagnostic log",
                path.exists(),
                &if path.exists() {
                    format!(
                        "{} recent events, {} failures",
                        recent.len(),
                        failures.len()
                    )
                } else {
                    "no log file yet".to_string()
                },
            );
            for event in failures.iter().rev().take(5) {
                println!(
                    "    {} {} {}",
                    event.timestamp.dimmed(),
                    event.target,
                    event.message.as_deref().unwrap_or_default().red()
                );
            }
        }
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// sentiview config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective sentiview Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.sentiview/config.toml");
    print_source(project_exists, ".sentiview.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "SENTIVIEW_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.sentiview/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
