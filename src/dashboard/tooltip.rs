//! Tooltip and scale formatting.
//!
//! Pure functions over normalized data; the rendered page only looks up the
//! strings computed here.

use crate::models::{Grid, Heatmap, Label, WEEKDAYS};
use crate::render::escape_html;

/// Share of `total` as a rounded whole percentage. Zero when `total` is zero.
pub fn pie_percentage(value: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((value as f64 / total as f64) * 100.0).round() as u64
}

/// `"POSITIVE: 5 (50%)"`.
pub fn pie_tooltip(label: Label, value: u64, total: u64) -> String {
    format!("{label}: {value} ({}%)", pie_percentage(value, total))
}

/// Top of the heatmap colour scale: the largest single cell across both
/// layers, never below 1.
pub fn heatmap_scale_max(heatmap: &Heatmap) -> u64 {
    heatmap
        .positive
        .iter()
        .chain(heatmap.negative.iter())
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Non-zero cells of `grid` as `[hour, day, count]`, row by row.
pub fn heatmap_points(grid: &Grid) -> Vec<[u64; 3]> {
    grid.iter()
        .enumerate()
        .flat_map(|(day, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(move |(hour, count)| [hour as u64, day as u64, *count])
        })
        .collect()
}

/// Tooltip for the cell at `(hour, day)`, reporting both layers.
///
/// Lines are separated with `<br>` as the heatmap tooltip renders HTML.
pub fn heatmap_tooltip(heatmap: &Heatmap, hour: usize, day: usize) -> String {
    let day_label = heatmap
        .days
        .get(day)
        .map(String::as_str)
        .or_else(|| WEEKDAYS.get(day).copied())
        .unwrap_or("?");

    format!(
        "{} at {hour}:00<br>Positive: {}<br>Negative: {}",
        escape_html(day_label),
        heatmap.count(Label::Positive, day, hour),
        heatmap.count(Label::Negative, day, hour),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::zero_grid;

    #[test]
    fn pie_percentage_of_empty_total_is_zero() {
        assert_eq!(pie_percentage(0, 0), 0);
        assert_eq!(pie_tooltip(Label::Positive, 0, 0), "POSITIVE: 0 (0%)");
        assert_eq!(pie_tooltip(Label::Negative, 0, 0), "NEGATIVE: 0 (0%)");
    }

    #[test]
    fn pie_percentage_rounds() {
        assert_eq!(pie_percentage(1, 3), 33);
        assert_eq!(pie_percentage(2, 3), 67);
        assert_eq!(pie_tooltip(Label::Positive, 5, 10), "POSITIVE: 5 (50%)");
    }

    #[test]
    fn scale_max_floors_at_one() {
        assert_eq!(heatmap_scale_max(&Heatmap::default()), 1);
    }

    #[test]
    fn scale_max_spans_both_layers() {
        let mut heatmap = Heatmap::default();
        heatmap.positive[1][3] = 4;
        heatmap.negative[6][23] = 9;
        assert_eq!(heatmap_scale_max(&heatmap), 9);
    }

    #[test]
    fn points_omit_zero_cells() {
        let mut grid = zero_grid();
        grid[2][14] = 3;
        grid[0][0] = 1;
        assert_eq!(heatmap_points(&grid), vec![[0, 0, 1], [14, 2, 3]]);
        assert!(heatmap_points(&zero_grid()).is_empty());
    }

    #[test]
    fn tooltip_reports_both_layers() {
        let mut heatmap = Heatmap::default();
        heatmap.positive[1][9] = 2;
        heatmap.negative[1][9] = 5;
        assert_eq!(
            heatmap_tooltip(&heatmap, 9, 1),
            "Mon at 9:00<br>Positive: 2<br>Negative: 5"
        );
    }

    #[test]
    fn tooltip_falls_back_to_canonical_day() {
        let mut heatmap = Heatmap::default();
        heatmap.days.clear();
        assert!(heatmap_tooltip(&heatmap, 0, 6).starts_with("Sat at 0:00"));
    }
}
