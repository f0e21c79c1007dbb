//! Inline SVG chart rendering
//!
//! The PDF renderer receives a self-contained HTML document, so charts are
//! generated as plain SVG strings from the model's chart series.

use crate::report::model::TrendSeries;

const WIDTH: f64 = 320.0;
const HEIGHT: f64 = 180.0;
const PLOT_LEFT: f64 = 34.0;
const PLOT_RIGHT: f64 = 310.0;
const PLOT_TOP: f64 = 12.0;
const PLOT_BOTTOM: f64 = 142.0;

/// Render a trend series as a line chart with point markers.
pub fn line_chart_svg(series: &TrendSeries, stroke: &str) -> String {
    let (min, max) = value_range(&series.values);
    let span = (max - min).max(1) as f64;
    let count = series.values.len().max(1);

    let step = if count > 1 {
        (PLOT_RIGHT - PLOT_LEFT) / (count as f64 - 1.0)
    } else {
        0.0
    };

    let mut points = String::new();
    let mut markers = String::new();
    let mut labels = String::new();

    for (i, value) in series.values.iter().enumerate() {
        let x = PLOT_LEFT + step * i as f64;
        let y = PLOT_BOTTOM - (*value - min) as f64 / span * (PLOT_BOTTOM - PLOT_TOP);
        points.push_str(&format!("{:.1},{:.1} ", x, y));
        markers.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\"/>",
            x, y, stroke
        ));
        if let Some(label) = series.labels.get(i) {
            labels.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"8\" text-anchor=\"middle\" fill=\"#64748b\">{}</text>",
                x,
                PLOT_BOTTOM + 14.0,
                label
            ));
        }
    }

    format!(
        "<svg viewBox=\"0 0 {WIDTH} {HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\">\
<polyline fill=\"none\" stroke=\"{stroke}\" stroke-width=\"2.5\" points=\"{points}\"/>\
{markers}{labels}</svg>",
        points = points.trim_end(),
    )
}

/// Render percentage buckets as a vertical bar chart with value labels.
pub fn bar_chart_svg(values: &[i64], labels: &[&str], colors: &[&str]) -> String {
    let max = values.iter().copied().max().unwrap_or(0).max(1) as f64;
    let count = values.len().max(1);
    let slot = (PLOT_RIGHT - PLOT_LEFT) / count as f64;
    let bar_width = slot * 0.6;

    let mut bars = String::new();
    for (i, value) in values.iter().enumerate() {
        let height = (*value).max(0) as f64 / max * (PLOT_BOTTOM - PLOT_TOP);
        let x = PLOT_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = PLOT_BOTTOM - height;
        let color = colors.get(i).copied().unwrap_or("#3b82f6");

        bars.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" rx=\"2\"/>",
            x, y, bar_width, height, color
        ));
        bars.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"8\" font-weight=\"bold\" text-anchor=\"middle\" fill=\"#1e293b\">{}%</text>",
            x + bar_width / 2.0,
            y - 4.0,
            value
        ));
        if let Some(label) = labels.get(i) {
            bars.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"8\" text-anchor=\"middle\" fill=\"#64748b\">{}</text>",
                x + bar_width / 2.0,
                PLOT_BOTTOM + 14.0,
                label
            ));
        }
    }

    format!(
        "<svg viewBox=\"0 0 {WIDTH} {HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\">{bars}</svg>"
    )
}

fn value_range(values: &[i64]) -> (i64, i64) {
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    // Pad a flat series so the line sits mid-chart instead of on an edge
    if min == max {
        (min - 1, max + 1)
    } else {
        (min, max)
    }
}
