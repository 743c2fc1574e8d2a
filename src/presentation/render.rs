// Plain-text rendering of the dashboard view
use crate::domain::dashboard::{CallRow, DashboardView};
use crate::presentation::chart_style::{tooltip_label, tooltip_title, CALL_CHART_STYLE};
use std::fmt::Write;

const RULE_WIDTH: usize = 64;

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RULE_WIDTH);

    let _ = writeln!(
        out,
        "Active calls: {}  [{}]",
        view.count, view.load.label
    );
    let _ = writeln!(out, "{}", rule);

    match view.placeholder {
        Some(placeholder) => {
            let _ = writeln!(out, "  {}", placeholder);
        }
        None => {
            for row in &view.calls {
                let _ = writeln!(out, "{}", render_call_row(row));
            }
        }
    }

    let _ = writeln!(out, "{}", rule);
    out.push_str(&render_chart(view));
    out
}

pub fn render_call_row(row: &CallRow) -> String {
    format!(
        "  {} -> {}  {}  {}  {}",
        row.from,
        row.to,
        row.duration,
        row.ivr.label,
        row.short_sid
    )
}

/// One horizontal bar per point, oldest at the top, with the capacity limit
/// marked at the right edge of the bar area.
pub fn render_chart(view: &DashboardView) -> String {
    let style = &CALL_CHART_STYLE;
    let capacity = style.capacity_line.value.max(1);
    let width = capacity as usize;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} (last {}, {} at {})",
        style.y_axis.title.unwrap_or(style.series_label),
        view.chart.len(),
        style.capacity_line.label,
        capacity
    );

    for point in &view.chart {
        let filled = point.value.clamp(0, capacity) as usize;
        let overflow = if point.value > capacity { "+" } else { "" };
        let _ = writeln!(
            out,
            "{:>8} |{}{}| {}{}",
            point.label,
            "#".repeat(filled),
            " ".repeat(width - filled),
            point.value,
            overflow
        );
    }

    if let Some(latest) = view.chart.last() {
        let _ = writeln!(
            out,
            "{} | {}",
            tooltip_title(&latest.label),
            tooltip_label(latest.value)
        );
    }

    out
}
