//! Bar-chart panels for monthly and hourly activity.

use ratatui::{
    layout::Rect,
    widgets::{BarChart, Block, Borders},
    Frame,
};

use history_core::models::{HourlyActivity, MonthlyActivity};

use crate::themes::Theme;

/// Width of a monthly bar; fits a `"YYYY-MM"` label.
const MONTH_BAR_WIDTH: u16 = 7;
const BAR_GAP: u16 = 1;

/// How many bars of `bar_width` fit into `area_width` once borders are
/// removed. Always at least one.
pub fn bars_that_fit(area_width: u16, bar_width: u16) -> usize {
    let inner = area_width.saturating_sub(2);
    let per_bar = bar_width + BAR_GAP;
    // The last bar needs no trailing gap.
    (((inner + BAR_GAP) / per_bar) as usize).max(1)
}

/// Monthly activity. When there are more months than fit, the most recent
/// ones are shown.
pub fn render_monthly_chart(
    frame: &mut Frame,
    area: Rect,
    monthly: &[MonthlyActivity],
    theme: &Theme,
) {
    let capacity = bars_that_fit(area.width, MONTH_BAR_WIDTH);
    let skip = monthly.len().saturating_sub(capacity);
    let data: Vec<(&str, u64)> = monthly[skip..]
        .iter()
        .map(|m| (m.year_month.as_str(), m.count as u64))
        .collect();

    let title = if skip > 0 {
        format!(" Monthly Activity (last {} months) ", data.len())
    } else {
        " Monthly Activity ".to_string()
    };

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(data.as_slice())
        .bar_width(MONTH_BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .bar_style(theme.bar_monthly)
        .value_style(theme.bar_value)
        .label_style(theme.label);
    frame.render_widget(chart, area);
}

/// Activity by hour of day, 24 bars.
pub fn render_hourly_chart(
    frame: &mut Frame,
    area: Rect,
    hourly: &[HourlyActivity],
    theme: &Theme,
) {
    let data: Vec<(&str, u64)> = hourly
        .iter()
        .map(|h| (h.hour.as_str(), h.count as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Viewing Activity by Hour "),
        )
        .data(data.as_slice())
        .bar_width(hourly_bar_width(area.width, data.len()))
        .bar_gap(BAR_GAP)
        .bar_style(theme.bar_hourly)
        .value_style(theme.bar_value)
        .label_style(theme.label);
    frame.render_widget(chart, area);
}

/// Widest bar that still fits `bars` bars, never narrower than a two-digit
/// hour label.
fn hourly_bar_width(area_width: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 2;
    }
    let inner = area_width.saturating_sub(2) + BAR_GAP;
    (inner / bars as u16).saturating_sub(BAR_GAP).max(2)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
