//! Table panels of the dashboard: channels, recurring titles and recent
//! history, plus the placeholder and error banner.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use history_core::formatting::{self, percentage};
use history_core::models::{ChannelStat, RecurringContentStat, WatchRecord};

use crate::themes::Theme;

/// Share of each channel within the listed channels, one decimal place.
///
/// The listed channels form the whole, the same way a pie chart of them
/// would.
pub fn channel_shares(channels: &[ChannelStat]) -> Vec<f64> {
    let whole: u32 = channels.iter().map(|c| c.count).sum();
    channels
        .iter()
        .map(|c| percentage(c.count as f64, whole as f64, 1))
        .collect()
}

fn striped(theme: &Theme, i: usize) -> ratatui::style::Style {
    if i % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
}

/// Top channels with watch counts and share.
pub fn render_channel_table(
    frame: &mut Frame,
    area: Rect,
    channels: &[ChannelStat],
    theme: &Theme,
) {
    let header = Row::new(
        ["#", "Channel", "Videos", "Share"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let shares = channel_shares(channels);
    let rows: Vec<Row> = channels
        .iter()
        .zip(shares)
        .enumerate()
        .map(|(i, (channel, share))| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(channel.name.clone()),
                Cell::from(formatting::format_count(channel.count as u64)),
                Cell::from(format!("{:.1}%", share)).style(theme.share_style(share)),
            ])
            .style(striped(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block("Top Channels"))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Titles watched more than once. `total_videos` is the record count used
/// for the share column.
pub fn render_recurring_table(
    frame: &mut Frame,
    area: Rect,
    recurring: &[RecurringContentStat],
    total_videos: usize,
    theme: &Theme,
) {
    let header = Row::new(
        ["Title", "Views", "Share"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let rows: Vec<Row> = recurring
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let share = percentage(item.count as f64, total_videos as f64, 1);
            Row::new(vec![
                Cell::from(item.display_title.clone()),
                Cell::from(item.count.to_string()),
                Cell::from(format!("{:.1}%", share)).style(theme.share_style(share)),
            ])
            .style(striped(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(7),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block("Recurring Content"))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Most-recent-first history. `records` must already be ordered and limited.
pub fn render_recent_table(frame: &mut Frame, area: Rect, records: &[WatchRecord], theme: &Theme) {
    let header = Row::new(
        ["Title", "Channel", "Watched"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Row::new(vec![
                Cell::from(record.title().to_string()),
                Cell::from(record.channel().to_string()).style(theme.label),
                Cell::from(formatting::format_short_datetime(&record.instant())),
            ])
            .style(striped(theme, i))
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(24),
        Constraint::Length(20),
    ];
    let title = format!("Recent History ({})", records.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(&title))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Placeholder shown before anything has been parsed.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No watch history loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Copy your Takeout watch-history page as text into a file and pass its path.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'r' to re-read the input file", theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(titled_block("YouTube History")),
        area,
    );
}

/// One-line `Error: <message>` banner.
pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled("Error: ", theme.error),
        Span::styled(message.to_string(), theme.error),
    ]);
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
