//! Help popup: key bindings and the chart color key

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::{Theme, IAP_COLOR, LN_COLOR, OTHER_COLOR};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const POPUP_WIDTH: u16 = 44;
const POPUP_HEIGHT: u16 = 19;

const KEYS: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Switch chart"),
    ("1-2", "Jump to chart"),
    ("Up/Down or j/k", "Scroll users"),
    ("Left/Right or h/l", "Scroll months"),
    ("q / Esc", "Quit"),
];

pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Popup rect centered in `area`, shrunk to fit small terminals
    pub fn centered_area(area: Rect) -> Rect {
        let width = POPUP_WIDTH.min(area.width);
        let height = POPUP_HEIGHT.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    fn header(&self, title: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn swatch(&self, symbol: &'static str, color: Color, desc: &'static str) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {}  ", symbol), Style::default().fg(color)),
            Span::styled(desc, Style::default().fg(self.theme.text())),
        ])
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let sep = Line::from(Span::styled(
            "─".repeat(width as usize),
            Style::default().fg(self.theme.muted()),
        ));

        let mut lines = vec![Line::default(), self.header("Keys"), sep.clone()];
        lines.extend(KEYS.iter().map(|&(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<18}", key),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(desc, Style::default().fg(self.theme.text())),
            ])
        }));

        lines.push(Line::default());
        lines.push(self.header("Colors"));
        lines.push(sep);
        lines.push(self.swatch("■", IAP_COLOR, "iap (App Store)"));
        lines.push(self.swatch("■", LN_COLOR, "ln (Lightning)"));
        lines.push(self.swatch("■", OTHER_COLOR, "other types"));
        lines.push(self.swatch("┃", self.theme.marker(), "today"));
        lines.push(Line::default());
        lines.push(
            Line::from(Span::styled(
                "Press ? to close",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center),
        );
        lines
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" subreport v{} ", VERSION))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(inner.width)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_help_popup_centered_area() {
        let popup = HelpPopup::centered_area(Rect::new(0, 0, 100, 50));

        assert_eq!(popup.width, POPUP_WIDTH);
        assert_eq!(popup.height, POPUP_HEIGHT);
        assert_eq!(popup.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup.y, (50 - POPUP_HEIGHT) / 2);
    }

    #[test]
    fn test_help_popup_small_terminal() {
        let popup = HelpPopup::centered_area(Rect::new(0, 0, 30, 10));
        assert_eq!(popup, Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_help_popup_lists_keys_and_colors() {
        let area = Rect::new(0, 0, POPUP_WIDTH, POPUP_HEIGHT);
        let mut buf = Buffer::empty(area);
        HelpPopup::default().render(area, &mut buf);

        let text: Vec<String> = (0..area.height).map(|y| row_text(&buf, y)).collect();
        assert!(text[0].contains("subreport v"));
        assert!(text.iter().any(|l| l.contains("Scroll months")));
        assert!(text.iter().any(|l| l.contains("ln (Lightning)")));

        let iap_row = text.iter().position(|l| l.contains("iap (App Store)")).unwrap();
        assert_eq!(buf[(3, iap_row as u16)].fg, IAP_COLOR);
    }
}
