use crate::themes::Theme;
use history_core::formatting::format_count;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const SPARKLES: &str = "▶ ▷ ▶ ▷";

/// Dashboard header rendering four lines:
///
/// 1. Application title with decorations.
/// 2. A 60-column `=` separator.
/// 3. `[ N videos analyzed | timezone ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// Number of parsed records.
    pub video_count: usize,
    /// IANA timezone the dates were resolved in.
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(video_count: usize, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            video_count,
            timezone,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" YOUTUBE WATCH HISTORY ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(status_text(self.video_count), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

/// `"N videos analyzed"` with thousands separators.
pub fn status_text(video_count: usize) -> String {
    format!("{} videos analyzed", format_count(video_count as u64))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new(4, "UTC", &theme).to_lines();
        assert_eq!(lines.len(), 4);
        assert!(line_text(&lines[3]).is_empty());
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new(4, "UTC", &theme).to_lines();
        let title = line_text(&lines[0]);
        assert!(title.contains("YOUTUBE WATCH HISTORY"), "got: {title}");
        assert!(title.starts_with(SPARKLES));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new(0, "UTC", &theme).to_lines();
        let sep = line_text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines = Header::new(1234, "America/New_York", &theme).to_lines();
        assert_eq!(
            line_text(&lines[2]),
            "[ 1,234 videos analyzed | America/New_York ]"
        );
        assert_eq!(lines[2].spans.len(), 5);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(4), "4 videos analyzed");
        assert_eq!(status_text(0), "0 videos analyzed");
    }
}
