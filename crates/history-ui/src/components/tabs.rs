use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::themes::Theme;

/// The dashboard's switchable panels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Channels,
    Monthly,
    Hourly,
    Recurring,
    Recent,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::Channels,
        DashboardTab::Monthly,
        DashboardTab::Hourly,
        DashboardTab::Recurring,
        DashboardTab::Recent,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardTab::Channels => "Channels",
            DashboardTab::Monthly => "Monthly",
            DashboardTab::Hourly => "Hourly",
            DashboardTab::Recurring => "Recurring",
            DashboardTab::Recent => "Recent",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous tab, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Render the tab bar with `selected` highlighted.
pub fn render_tabs(frame: &mut Frame, area: Rect, selected: DashboardTab, theme: &Theme) {
    let titles: Vec<&str> = DashboardTab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(selected.index())
        .style(theme.tab_inactive)
        .highlight_style(theme.tab_active)
        .divider(" | ")
        .block(Block::default().borders(Borders::BOTTOM).border_style(theme.separator));
    frame.render_widget(tabs, area);
}
