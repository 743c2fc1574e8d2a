// Styling for the call history chart
use serde::Serialize;

/// Harness refuses new calls at this many active calls.
pub const MAX_CAPACITY: i64 = 20;

#[derive(Debug, Clone, Serialize)]
pub struct AxisStyle {
    pub title: Option<&'static str>,
    pub min: i64,
    pub max: Option<i64>,
    pub step: Option<i64>,
    pub max_ticks: Option<usize>,
    pub tick_color: &'static str,
    pub grid_color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapacityLine {
    pub value: i64,
    pub label: &'static str,
    pub color: &'static str,
    pub dash: [u8; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartStyle {
    pub series_label: &'static str,
    pub line_color: &'static str,
    pub fill_color: &'static str,
    pub tension: f64,
    pub x_axis: AxisStyle,
    pub y_axis: AxisStyle,
    pub capacity_line: CapacityLine,
    pub point_radius: u8,
    pub animation_ms: u32,
}

pub const CALL_CHART_STYLE: ChartStyle = ChartStyle {
    series_label: "Active Calls",
    line_color: "#3a86ff",
    fill_color: "rgba(58, 134, 255, 0.1)",
    tension: 0.4,
    x_axis: AxisStyle {
        title: None,
        min: 0,
        max: None,
        step: None,
        max_ticks: Some(10),
        tick_color: "rgba(255, 255, 255, 0.7)",
        grid_color: None,
    },
    y_axis: AxisStyle {
        title: Some("Number of Calls"),
        min: 0,
        max: Some(MAX_CAPACITY),
        step: Some(5),
        max_ticks: None,
        tick_color: "rgba(255, 255, 255, 0.7)",
        grid_color: Some("rgba(255, 255, 255, 0.1)"),
    },
    capacity_line: CapacityLine {
        value: MAX_CAPACITY,
        label: "Max Capacity",
        color: "rgba(255, 0, 0, 0.5)",
        dash: [6, 6],
    },
    point_radius: 3,
    animation_ms: 800,
};

pub fn tooltip_title(label: &str) -> String {
    format!("Time: {}", label)
}

pub fn tooltip_label(value: i64) -> String {
    format!("Active Calls: {}", value)
}
