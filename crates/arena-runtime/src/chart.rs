//! Top-strategies line chart: a plot model in a 100x100 view box and a
//! standalone SVG rendering of it.

use crate::ranking::StrategySeries;
use arena_core::{format_money, month_key};

const FALLBACK_MIN: f64 = 800_000.0;
const FALLBACK_MAX: f64 = 1_200_000.0;
const X_START: f64 = 8.0;
const GRID_STEPS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 390.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_TOP: f64 = 20.0;
const PLOT_WIDTH: f64 = 550.0;
const PLOT_HEIGHT: f64 = 300.0;

/// One plotted series; points are `(x, y)` in view-box units, y down.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub color: &'static str,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartModel {
    pub y_min: f64,
    pub y_max: f64,
    pub lines: Vec<ChartLine>,
    /// `(x, YYYY-MM)` for the first, middle and last month.
    pub x_ticks: Vec<(f64, String)>,
    /// `(y, money label)` for each horizontal grid line, top to bottom.
    pub grid: Vec<(f64, String)>,
}

fn x_position(i: usize, n: usize) -> f64 {
    X_START + i as f64 / n.saturating_sub(1).max(1) as f64 * (100.0 - X_START)
}

/// Lay out `series` against `dates`. `None` when there is nothing to draw.
pub fn build_chart(dates: &[String], series: &[StrategySeries]) -> Option<ChartModel> {
    let len = series
        .iter()
        .map(|s| s.values.len())
        .max()
        .unwrap_or(0)
        .min(dates.len());
    if len == 0 {
        return None;
    }

    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in series.iter().flat_map(|s| &s.values).filter(|v| v.is_finite()) {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        lo = FALLBACK_MIN;
        hi = FALLBACK_MAX;
    }
    let pad = (hi - lo).max(1.0) * 0.05;
    let (y_min, y_max) = (lo - pad, hi + pad);
    let y_position = |v: f64| {
        let v = if v.is_finite() { v.clamp(y_min, y_max) } else { y_min };
        100.0 - (v - y_min) / (y_max - y_min) * 100.0
    };

    let lines = series
        .iter()
        .map(|s| {
            let n = s.values.len();
            ChartLine {
                label: s.label.clone(),
                color: s.color,
                points: s
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (x_position(i, n), y_position(*v)))
                    .collect(),
            }
        })
        .collect();

    let mut tick_idx = vec![0, (len - 1) / 2, len - 1];
    tick_idx.dedup();
    let x_ticks = tick_idx
        .into_iter()
        .map(|i| (x_position(i, len), month_key(&dates[i]).to_string()))
        .collect();
    let grid = GRID_STEPS
        .iter()
        .map(|t| (t * 100.0, format_money(y_max - (y_max - y_min) * t)))
        .collect();

    Some(ChartModel {
        y_min,
        y_max,
        lines,
        x_ticks,
        grid,
    })
}

fn px(x: f64) -> f64 {
    MARGIN_LEFT + x / 100.0 * PLOT_WIDTH
}

fn py(y: f64) -> f64 {
    MARGIN_TOP + y / 100.0 * PLOT_HEIGHT
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Standalone SVG document for a chart model.
pub fn render_svg(model: &ChartModel) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#94a3b8}}</style>"#
    );
    svg.push_str(&format!(
        r##"<rect x="0" y="0" width="{WIDTH}" height="{HEIGHT}" fill="#020617" />"##
    ));

    for (y, label) in &model.grid {
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#1e293b" stroke-width="0.5" />"##,
            x1 = px(0.0),
            x2 = px(100.0),
            y = py(*y)
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
            x = px(0.0) - 6.0,
            y = py(*y) + 4.0,
            label = escape(label)
        ));
    }

    let axis_y = py(100.0);
    for (x, label) in &model.x_ticks {
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#334155" stroke-width="1" />"##,
            x = px(*x),
            y1 = axis_y,
            y2 = axis_y + 4.0
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = px(*x),
            y = axis_y + 18.0,
            label = escape(label)
        ));
    }

    for line in &model.lines {
        let coords = line
            .points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", px(*x), py(*y)))
            .collect::<Vec<_>>()
            .join(" ");
        svg.push_str(&format!(
            r#"<polyline fill="none" stroke="{color}" stroke-width="2" points="{coords}" />"#,
            color = line.color
        ));
    }

    let legend_y = axis_y + 44.0;
    for (i, line) in model.lines.iter().enumerate() {
        let x = MARGIN_LEFT + i as f64 * 180.0;
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="3" />"#,
            x2 = x + 20.0,
            y = legend_y - 4.0,
            color = line.color
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="start">{label}</text>"#,
            x = x + 26.0,
            y = legend_y,
            label = escape(&line.label)
        ));
    }

    svg.push_str("</svg>");
    svg
}
