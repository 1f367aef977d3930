//! Monthly active subscriptions widget - stacked bars per month and type

use std::ops::Range;

use chrono::Datelike;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::legend::Legend;
use super::tabs::{Tab, TabBar};
use crate::services::activity::{Activity, MonthlyActive};
use crate::tui::theme::Theme;

/// Y-axis label column width, including the axis line
const Y_AXIS_WIDTH: u16 = 7;
const BAR_WIDTH: u16 = 2;
const BAR_GAP: u16 = 1;
const SLOT_WIDTH: u16 = BAR_WIDTH + BAR_GAP;

/// Data for the monthly active view
#[derive(Debug)]
pub struct ActiveData {
    pub months: Vec<MonthlyActive>,
    /// Stacking order, bottom first
    pub types: Vec<String>,
    pub max_total: u64,
}

impl ActiveData {
    pub fn from_monthly(months: Vec<MonthlyActive>) -> Self {
        let types = Activity::types(&months);
        let max_total = months.iter().map(|m| m.total()).max().unwrap_or(0);
        Self {
            months,
            types,
            max_total,
        }
    }

    /// Number of months hidden on the left when `fit` bars are shown
    pub fn max_scroll_offset(&self, fit: usize) -> usize {
        self.months.len().saturating_sub(fit)
    }
}

/// Cumulative-rounded segment heights so the stack top matches the total
pub fn stack_heights(counts: &[u64], max: u64, height: u16) -> Vec<u16> {
    if max == 0 {
        return vec![0; counts.len()];
    }
    let scale = |v: u64| ((v as f64 / max as f64) * height as f64).round() as u16;
    let mut cumulative = 0u64;
    let mut drawn = 0u16;
    counts
        .iter()
        .map(|&c| {
            cumulative += c;
            let top = scale(cumulative).min(height);
            let segment = top.saturating_sub(drawn);
            drawn = drawn.max(top);
            segment
        })
        .collect()
}

/// Index range of months shown when `fit` bars fit, `offset_from_end` months scrolled back
pub fn visible_window(len: usize, fit: usize, offset_from_end: usize) -> Range<usize> {
    let end = len.saturating_sub(offset_from_end).max(fit.min(len));
    let start = end.saturating_sub(fit);
    start..end
}

/// How many bars fit in a view `width` cells wide
pub fn bars_that_fit(width: u16) -> usize {
    (width.saturating_sub(Y_AXIS_WIDTH) / SLOT_WIDTH) as usize
}

pub struct ActiveView<'a> {
    data: &'a ActiveData,
    tabs: &'a [Tab],
    scroll_offset: usize,
    theme: Theme,
}

impl<'a> ActiveView<'a> {
    pub fn new(data: &'a ActiveData, scroll_offset: usize, theme: Theme) -> Self {
        Self {
            data,
            tabs: Tab::all(),
            scroll_offset,
            theme,
        }
    }

    pub fn with_tabs(mut self, tabs: &'a [Tab]) -> Self {
        self.tabs = tabs;
        self
    }
}

impl Widget for ActiveView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Bars
            Constraint::Length(1), // Month labels
            Constraint::Length(1), // Year labels
            Constraint::Length(1), // Legend
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(area);

        TabBar::new(self.tabs, Tab::Active, self.theme).render(chunks[1], buf);
        self.render_separator(chunks[2], buf);

        let window = visible_window(
            self.data.months.len(),
            bars_that_fit(area.width),
            self.scroll_offset,
        );
        self.render_title(chunks[3], buf, window.clone());

        if self.data.months.is_empty() {
            Paragraph::new("No active subscriptions")
                .style(Style::default().fg(self.theme.muted()))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        } else {
            self.render_y_axis(chunks[4], buf);
            self.render_bars(chunks[4], buf, window.clone());
            self.render_x_labels(chunks[5], chunks[6], buf, window);
        }

        Legend::new(&self.data.types, self.theme)
            .with_title("Subscription Type")
            .render(chunks[7], buf);
        self.render_separator(chunks[8], buf);
        self.render_keybindings(chunks[9], buf);
    }
}

impl ActiveView<'_> {
    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &line, Style::default().fg(self.theme.muted()));
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer, window: Range<usize>) {
        let mut spans = vec![Span::styled(
            "Monthly Active Subscriptions by Type",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )];
        let shown = &self.data.months[window];
        if let (Some(first), Some(last)) = (shown.first(), shown.last()) {
            spans.push(Span::styled(
                format!("  ({} to {})", first.label(), last.label()),
                Style::default().fg(self.theme.muted()),
            ));
        }
        let title = Line::from(spans);
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_y_axis(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = Style::default().fg(self.theme.muted());
        let bottom = area.y + area.height - 1;
        for y in area.y..area.y + area.height {
            buf.set_string(area.x + Y_AXIS_WIDTH - 1, y, "│", style);
        }
        let label_width = (Y_AXIS_WIDTH - 2) as usize;
        buf.set_string(
            area.x,
            area.y,
            format!("{:>width$}", self.data.max_total, width = label_width),
            style,
        );
        buf.set_string(area.x, bottom, format!("{:>width$}", 0, width = label_width), style);
    }

    fn render_bars(&self, area: Rect, buf: &mut Buffer, window: Range<usize>) {
        let bottom = area.y + area.height;
        let block = "█".repeat(BAR_WIDTH as usize);

        for (slot, month) in self.data.months[window].iter().enumerate() {
            let x = area.x + Y_AXIS_WIDTH + slot as u16 * SLOT_WIDTH;
            let counts: Vec<u64> = self.data.types.iter().map(|t| month.count(t)).collect();
            let heights = stack_heights(&counts, self.data.max_total, area.height);

            let mut y = bottom;
            for (kind, h) in self.data.types.iter().zip(heights) {
                let style = Style::default().fg(self.theme.type_color(kind));
                for _ in 0..h {
                    y -= 1;
                    buf.set_string(x, y, &block, style);
                }
            }
        }
    }

    fn render_x_labels(
        &self,
        months_row: Rect,
        years_row: Rect,
        buf: &mut Buffer,
        window: Range<usize>,
    ) {
        let month_style = Style::default().fg(self.theme.date());
        let year_style = Style::default().fg(self.theme.muted());
        buf.set_string(
            months_row.x,
            months_row.y,
            format!("{:>width$}", "Month", width = (Y_AXIS_WIDTH - 2) as usize),
            year_style,
        );

        for (slot, month) in self.data.months[window].iter().enumerate() {
            let x = Y_AXIS_WIDTH + slot as u16 * SLOT_WIDTH;
            let date = month.month;
            buf.set_string(
                months_row.x + x,
                months_row.y,
                format!("{:02}", date.month()),
                month_style,
            );
            if slot == 0 || date.month() == 1 {
                buf.set_string(
                    years_row.x + x,
                    years_row.y,
                    date.format("'%y").to_string(),
                    year_style,
                );
            }
        }
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(self.theme.accent());
        let desc = Style::default().fg(self.theme.muted());
        let line = Line::from(vec![
            Span::styled("Tab", key),
            Span::styled(": Switch  ", desc),
            Span::styled("←→/hl", key),
            Span::styled(": Scroll  ", desc),
            Span::styled("?", key),
            Span::styled(": Help  ", desc),
            Span::styled("q", key),
            Span::styled(": Quit", desc),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
