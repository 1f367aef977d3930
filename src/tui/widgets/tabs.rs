//! Tab bar widget for chart navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Available charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Timeline,
    Active,
}

impl Tab {
    /// Get the display label for this tab
    pub fn label(self) -> &'static str {
        match self {
            Self::Timeline => "Timeline",
            Self::Active => "Active",
        }
    }

    /// Get all tabs in order
    pub fn all() -> &'static [Tab] {
        &[Tab::Timeline, Tab::Active]
    }
}

/// Tab bar widget showing the tabs enabled for this session
pub struct TabBar<'a> {
    tabs: &'a [Tab],
    selected: Tab,
    theme: Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [Tab], selected: Tab, theme: Theme) -> Self {
        Self {
            tabs,
            selected,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let display = |tab: Tab| {
            if tab == self.selected {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        };

        // Total width of all tabs for centering
        let total_width: u16 = self
            .tabs
            .iter()
            .map(|&tab| display(tab).len() as u16 + 2)
            .sum::<u16>()
            .saturating_sub(2);

        let mut x = area.x + (area.width.saturating_sub(total_width)) / 2;

        for &tab in self.tabs {
            let text = display(tab);
            let len = text.len() as u16;
            if x + len > area.x + area.width {
                break;
            }

            let style = if tab == self.selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &text, style);
            x += len + 2;
        }
    }
}
