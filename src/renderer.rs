//! # Forecast Text Rendering
//!
//! Plain-text views of forecast data for terminal output:
//! - [`format_point`]: every display attribute of one point
//! - [`format_block`]: block summary plus one line per point
//! - [`render_chart`]: breaking-height bar chart over a block
//!
//! The chart plots one column per point. The solid part of a bar (`█`) rises
//! to the minimum breaking height, the shaded part (`▒`) continues up to the
//! maximum. Day boundaries (every 8th point) are marked under the chart.

use crate::attributes::{display_value, Attribute};
use crate::forecast::{ForecastDataBlock, ForecastDataPoint, DAILY_STRIDE, NO_FORECASTS};

const ROWS: usize = 12;
const Y_AXIS_WIDTH: usize = 5; // Space for Y-axis labels

/// Attribute table for one point, headed by its start time and summary.
pub fn format_point(point: &ForecastDataPoint) -> String {
    let mut out = format!("{}\n", point.attr(Attribute::Begins));
    if let Some(summary) = point.summary() {
        out.push_str(&format!("  {summary}\n"));
    }
    for (attr, text) in point.attrs().iter() {
        out.push_str(&format!("  {:<24}{}\n", attr.name(), text));
    }
    out
}

/// One line per point under the block summary.
pub fn format_block(block: &ForecastDataBlock) -> String {
    let mut out = format!("{}\n", block.summary());
    for point in block {
        let rating = point
            .rating()
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<10} {:>8} - {:<8} {:<12} {:<12} {}\n",
            point.attr(Attribute::Begins),
            point.attr(Attribute::MinBreakingHeight),
            point.attr(Attribute::MaxBreakingHeight),
            point.attr(Attribute::SwellPeriod),
            point.attr(Attribute::WindSpeed),
            rating
        ));
    }
    out
}

/// Breaking-height bar chart as text.
pub fn render_chart(block: &ForecastDataBlock) -> String {
    if block.is_empty() {
        return format!("{NO_FORECASTS}\n");
    }

    let bars: Vec<Option<(f64, f64)>> = block.iter().map(breaking_range).collect();
    let top = bars
        .iter()
        .flatten()
        .map(|&(_, max)| max)
        .fold(f64::NEG_INFINITY, f64::max);
    if !top.is_finite() {
        return "No breaking heights to chart.\n".to_string();
    }
    // flat calm still gets a one-unit axis
    let top = if top > 0.0 { top } else { 1.0 };

    let height_to_row = |height: f64| {
        let normalized = (height / top).clamp(0.0, 1.0);
        ((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize
    };

    let columns = bars.len();
    let mut grid = vec![vec![' '; columns + Y_AXIS_WIDTH]; ROWS];
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    // Y-axis labels, at most one per row
    let step = label_step(top);
    let labels = (0..ROWS)
        .map(|i| i as f64 * step)
        .take_while(|height| *height <= top);
    for label_height in labels {
        let row = height_to_row(label_height);
        let label = format!("{:<width$}", format_height(label_height), width = Y_AXIS_WIDTH - 1);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
    }

    for (column, bar) in bars.iter().enumerate() {
        let Some((min, max)) = *bar else { continue };
        let top_row = height_to_row(max);
        let solid_row = height_to_row(min);
        for (row, line) in grid.iter_mut().enumerate().skip(top_row) {
            line[column + Y_AXIS_WIDTH] = if row >= solid_row { '█' } else { '▒' };
        }
    }

    let unit = block
        .current()
        .and_then(|p| p.flat().get("swell_unit"))
        .map(display_value)
        .unwrap_or_default();

    let mut out = format!("Breaking height ({unit})\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    // Day markers below the chart
    let padding = " ".repeat(Y_AXIS_WIDTH);
    let markers: String = (0..columns)
        .map(|i| if i % DAILY_STRIDE == 0 { '|' } else { ' ' })
        .collect();
    out.push_str(&format!("{padding}{}\n", markers.trim_end()));

    let mut labels = vec![' '; columns + 3];
    for (i, point) in block.iter().enumerate().step_by(DAILY_STRIDE) {
        if let Some(day) = point.attrs().value(Attribute::Begins) {
            for (offset, ch) in day.chars().take(3).enumerate() {
                labels[i + offset] = ch;
            }
        }
    }
    let labels: String = labels.into_iter().collect();
    out.push_str(&format!("{padding}{}\n", labels.trim_end()));
    out
}

/// `(min, max)` breaking height of a point; min falls back to max.
fn breaking_range(point: &ForecastDataPoint) -> Option<(f64, f64)> {
    let flat = point.flat();
    let max = flat.get("swell_maxBreakingHeight")?.as_f64()?;
    let min = flat
        .get("swell_minBreakingHeight")
        .and_then(|v| v.as_f64())
        .unwrap_or(max)
        .min(max);
    Some((min, max))
}

/// Label spacing: a round step for surfable heights, widened so the axis
/// never needs more labels than rows.
fn label_step(top: f64) -> f64 {
    let round: f64 = if top > 8.0 {
        2.0
    } else if top > 4.0 {
        1.0
    } else {
        0.5
    };
    round.max(top / (ROWS as f64 - 1.0))
}

/// Format a height label with appropriate precision
fn format_height(height: f64) -> String {
    if height.fract() == 0.0 {
        format!("{:.0}", height)
    } else {
        format!("{:.1}", height)
    }
}
