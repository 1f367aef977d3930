//! Subscription type legend

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

pub struct Legend<'a> {
    title: Option<&'a str>,
    types: &'a [String],
    theme: Theme,
}

impl<'a> Legend<'a> {
    pub fn new(types: &'a [String], theme: Theme) -> Self {
        Self {
            title: None,
            types,
            theme,
        }
    }

    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    fn line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        if let Some(title) = self.title {
            spans.push(Span::styled(
                format!("{}: ", title),
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        for (i, kind) in self.types.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                "■ ",
                Style::default().fg(self.theme.type_color(kind)),
            ));
            spans.push(Span::styled(
                kind.clone(),
                Style::default().fg(self.theme.text()),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for Legend<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line())
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_lists_types_with_title() {
        let types = vec!["iap".to_string(), "ln".to_string()];
        let line = Legend::new(&types, Theme::Dark)
            .with_title("Subscription Type")
            .line();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Subscription Type: ■ iap  ■ ln");
    }

    #[test]
    fn test_legend_swatch_uses_type_color() {
        let types = vec!["ln".to_string()];
        let line = Legend::new(&types, Theme::Dark).line();
        assert_eq!(line.spans[0].style.fg, Some(Theme::Dark.type_color("ln")));
    }
}
