//! Dashboard state and the terminal event loop.
//!
//! [`App`] owns the theme, the selected tab and the path the input was read
//! from. The [`HistoryStore`] stays with the caller and is borrowed for the
//! lifetime of the loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame, Terminal,
};

use history_runtime::store::HistoryStore;

use crate::chart_view;
use crate::components::header::{status_text, Header};
use crate::components::tabs::{render_tabs, DashboardTab};
use crate::table_view;
use crate::themes::Theme;

/// Key hints shown next to the status text.
const KEY_HINTS: &str = "←/→ switch view · r re-parse · q quit";

// ── App ───────────────────────────────────────────────────────────────────────

/// Root state of the dashboard.
pub struct App {
    pub theme: Theme,
    pub tab: DashboardTab,
    /// File re-read by the `r` key. `None` when the input came from stdin or
    /// the built-in sample; `r` then re-parses the text already held.
    pub input_path: Option<PathBuf>,
    /// Rows in the Recent tab.
    pub history_limit: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, input_path: Option<PathBuf>, history_limit: usize) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: DashboardTab::Channels,
            input_path,
            history_limit,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout; there is no
    /// background work, so the loop only redraws after input.
    pub fn run_dashboard(mut self, store: &mut HistoryStore) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, store)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key, store),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent, store: &mut HistoryStore) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Left | KeyCode::BackTab => self.tab = self.tab.previous(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reparse(store),
            _ => {}
        }
    }

    /// Re-read the input file, or re-parse the held text when there is none.
    /// Failures land in the store's error banner.
    fn reparse(&self, store: &mut HistoryStore) {
        if store.is_busy() {
            return;
        }
        let outcome = match &self.input_path {
            Some(path) => store.reload_from(path),
            None if store.can_analyze() => store.analyze(),
            None => return,
        };
        if let Err(e) = outcome {
            tracing::debug!(error = %e, "re-parse from dashboard failed");
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame, store: &HistoryStore) {
        let timezone = store.normalizer().timezone().name();
        let header = Header::new(store.records().len(), timezone, &self.theme);
        let banner_height = if store.last_error().is_some() { 1 } else { 0 };

        let [header_area, status_area, banner_area, tabs_area, body_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        let status = Line::from(vec![
            Span::styled(status_text(store.records().len()), self.theme.success),
            Span::styled("   ", self.theme.dim),
            Span::styled(KEY_HINTS, self.theme.dim),
        ]);
        frame.render_widget(Paragraph::new(status), status_area);

        if let Some(message) = store.last_error() {
            table_view::render_error_banner(frame, banner_area, message, &self.theme);
        }

        render_tabs(frame, tabs_area, self.tab, &self.theme);

        if !store.is_processed() {
            table_view::render_no_data(frame, body_area, &self.theme);
            return;
        }

        let dashboard = store.dashboard();
        match self.tab {
            DashboardTab::Channels => {
                table_view::render_channel_table(frame, body_area, &dashboard.channels, &self.theme)
            }
            DashboardTab::Monthly => {
                chart_view::render_monthly_chart(frame, body_area, &dashboard.monthly, &self.theme)
            }
            DashboardTab::Hourly => {
                chart_view::render_hourly_chart(frame, body_area, &dashboard.hourly, &self.theme)
            }
            DashboardTab::Recurring => table_view::render_recurring_table(
                frame,
                body_area,
                &dashboard.recurring,
                store.records().len(),
                &self.theme,
            ),
            DashboardTab::Recent => {
                let recent = store.recent(self.history_limit);
                table_view::render_recent_table(frame, body_area, &recent, &self.theme)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use history_core::error::EMPTY_RESULT_MESSAGE;
    use history_core::time_utils::DateTimeNormalizer;
    use history_runtime::data::sample::SAMPLE_DATA;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_store() -> HistoryStore {
        let mut store = HistoryStore::new(DateTimeNormalizer::new("America/New_York"));
        store.parse(SAMPLE_DATA).unwrap();
        store
    }

    fn draw(app: &App, store: &HistoryStore) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame, store)).unwrap();
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", None, 10);
        assert_eq!(app.tab, DashboardTab::Channels);
        assert!(!app.should_quit);
        assert_eq!(app.history_limit, 10);
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut store = sample_store();

        let mut app = App::new("dark", None, 10);
        app.handle_key(key(KeyCode::Char('q')), &mut store);
        assert!(app.should_quit);

        let mut app = App::new("dark", None, 10);
        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut store,
        );
        assert!(app.should_quit);

        let mut app = App::new("dark", None, 10);
        app.handle_key(key(KeyCode::Char('c')), &mut store);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_tab_navigation() {
        let mut store = sample_store();
        let mut app = App::new("dark", None, 10);

        app.handle_key(key(KeyCode::Right), &mut store);
        assert_eq!(app.tab, DashboardTab::Monthly);
        app.handle_key(key(KeyCode::Tab), &mut store);
        assert_eq!(app.tab, DashboardTab::Hourly);
        app.handle_key(key(KeyCode::Left), &mut store);
        assert_eq!(app.tab, DashboardTab::Monthly);
    }

    #[test]
    fn test_reparse_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        std::fs::write(&path, "no entries here").unwrap();

        let mut store = sample_store();
        let mut app = App::new("dark", Some(path.clone()), 10);

        app.handle_key(key(KeyCode::Char('r')), &mut store);
        assert!(!store.is_processed());
        assert_eq!(store.last_error(), Some(EMPTY_RESULT_MESSAGE));

        std::fs::write(&path, SAMPLE_DATA).unwrap();
        app.handle_key(key(KeyCode::Char('r')), &mut store);
        assert!(store.is_processed());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_reparse_without_file_uses_held_text() {
        let mut store = sample_store();
        let mut app = App::new("dark", None, 10);
        app.handle_key(key(KeyCode::Char('r')), &mut store);
        assert!(store.is_processed());
        assert_eq!(store.records().len(), 4);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_channels_tab() {
        let store = sample_store();
        let app = App::new("dark", None, 10);
        let screen = draw(&app, &store);

        assert!(screen.contains("YOUTUBE WATCH HISTORY"));
        assert!(screen.contains("4 videos analyzed"));
        assert!(screen.contains("Top Channels"));
        assert!(screen.contains("Prof. John Gallaugher"));
        assert!(!screen.contains("Error:"));
    }

    #[test]
    fn test_render_each_tab() {
        let store = sample_store();
        let mut app = App::new("light", None, 2);
        let expected = [
            (DashboardTab::Monthly, "Monthly Activity"),
            (DashboardTab::Hourly, "Viewing Activity by Hour"),
            (DashboardTab::Recurring, "Recurring Content"),
            (DashboardTab::Recent, "Recent History (2)"),
        ];
        for (tab, title) in expected {
            app.tab = tab;
            let screen = draw(&app, &store);
            assert!(screen.contains(title), "{:?} missing {}", tab, title);
        }
    }

    #[test]
    fn test_render_error_banner_and_placeholder() {
        let mut store = HistoryStore::new(DateTimeNormalizer::new("UTC"));
        let _ = store.parse("");
        let app = App::new("dark", None, 10);
        let screen = draw(&app, &store);

        assert!(screen.contains("Error: No valid watch history entries found."));
        assert!(screen.contains("No watch history loaded"));
        assert!(screen.contains("0 videos analyzed"));
    }
}
