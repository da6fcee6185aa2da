use serde::Serialize;

use super::types::SeriesPoint;

pub const CHART_HEIGHT: f64 = 320.0;
pub const BOTTOM_AXIS_HEIGHT: f64 = 32.0;
pub const LEFT_AXIS_WIDTH: f64 = 80.0;
pub const RIGHT_AXIS_WIDTH: f64 = 80.0;
pub const MIN_STEP_X: f64 = 28.0;
pub const MAX_STEP_X: f64 = 64.0;
pub const MIN_PLOT_WIDTH: f64 = 160.0;
pub const MAX_X_LABELS: usize = 12;
pub const SCROLL_HINT_FADE_DISTANCE: f64 = 80.0;
pub const SCROLL_HINT_MIN_VISIBLE_OPACITY: f64 = 0.02;

const Y_TICK_FRACTIONS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGeometry {
    pub left_axis_width: f64,
    pub right_axis_width: f64,
    pub step_x: f64,
    pub content_width: f64,
    pub container_width: f64,
    pub is_scrollable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisLabel {
    pub index: usize,
    pub month: u32,
    pub x: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub geometry: ChartGeometry,
    pub max_y: f64,
    pub y_ticks: Vec<f64>,
    /// Right-axis tick labels are only drawn on a scrollable chart; a
    /// static chart reclaims that band for the plot.
    pub show_right_axis: bool,
    pub invested_points: Vec<ChartPoint>,
    pub balance_points: Vec<ChartPoint>,
    pub x_labels: Vec<XAxisLabel>,
}

/// Chart geometry and line coordinates for a projection series. `None`
/// signals the empty state; no geometry is computed.
pub fn layout(series: &[SeriesPoint], container_width: f64) -> Option<ChartLayout> {
    if series.is_empty() {
        return None;
    }

    // No-headroom scale: the tallest balance touches the top of the plot.
    let max_y = series.iter().map(|p| p.balance).fold(1.0_f64, f64::max);
    let y_ticks: Vec<f64> = Y_TICK_FRACTIONS.iter().map(|t| t * max_y).collect();

    let target_plot_width = (container_width - LEFT_AXIS_WIDTH - RIGHT_AXIS_WIDTH).max(MIN_PLOT_WIDTH);
    let raw_step = if series.len() > 1 {
        target_plot_width / (series.len() - 1) as f64
    } else {
        target_plot_width
    };
    let step_x = raw_step.floor().clamp(MIN_STEP_X, MAX_STEP_X);
    let content_width = LEFT_AXIS_WIDTH + (series.len() - 1) as f64 * step_x + RIGHT_AXIS_WIDTH;
    let is_scrollable = content_width > container_width;

    let geometry = ChartGeometry {
        left_axis_width: LEFT_AXIS_WIDTH,
        right_axis_width: RIGHT_AXIS_WIDTH,
        step_x,
        content_width,
        container_width,
        is_scrollable,
    };

    Some(ChartLayout {
        geometry,
        max_y,
        y_ticks,
        show_right_axis: is_scrollable,
        invested_points: line_points(series, step_x, max_y, |p| p.invested),
        balance_points: line_points(series, step_x, max_y, |p| p.balance),
        x_labels: thin_x_labels(series, step_x),
    })
}

fn line_points(
    series: &[SeriesPoint],
    step_x: f64,
    max_y: f64,
    value: impl Fn(&SeriesPoint) -> f64,
) -> Vec<ChartPoint> {
    series
        .iter()
        .enumerate()
        .map(|(i, p)| ChartPoint {
            x: LEFT_AXIS_WIDTH + i as f64 * step_x,
            y: y_to_px(value(p), max_y),
        })
        .collect()
}

fn y_to_px(value: f64, max_y: f64) -> f64 {
    let plot_height = CHART_HEIGHT - BOTTOM_AXIS_HEIGHT;
    (plot_height * (1.0 - value / max_y)).clamp(0.0, plot_height)
}

fn thin_x_labels(series: &[SeriesPoint], step_x: f64) -> Vec<XAxisLabel> {
    let stride = (series.len() / (MAX_X_LABELS - 1)).max(1);
    series
        .iter()
        .enumerate()
        .filter(|&(i, _)| i % stride == 0 || i == series.len() - 1)
        .map(|(i, p)| XAxisLabel {
            index: i,
            month: p.month,
            x: LEFT_AXIS_WIDTH + i as f64 * step_x,
        })
        .collect()
}

/// Opacity of the "more content this way" hint, fully opaque at rest and
/// gone after the first 80 units of scroll.
pub fn scroll_hint_opacity(scroll_offset_x: f64) -> f64 {
    (1.0 - scroll_offset_x / SCROLL_HINT_FADE_DISTANCE).clamp(0.0, 1.0)
}

pub fn scroll_hint_visible(opacity: f64) -> bool {
    opacity > SCROLL_HINT_MIN_VISIBLE_OPACITY
}

/// Approximate inner width used before the rendering surface has reported
/// a measured container width (screen, card, and plot padding removed).
pub fn fallback_container_width(screen_width: f64) -> f64 {
    (screen_width - 96.0).floor().max(320.0)
}
