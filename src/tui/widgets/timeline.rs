//! Timeline widget - one row per user, one bar per subscription period

use chrono::DateTime;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::legend::Legend;
use super::tabs::{Tab, TabBar};
use crate::services::activity::{Activity, TimelineRow};
use crate::tui::theme::Theme;
use crate::types::Subscription;

/// Width of the "User ID" label column, including the axis line
const LABEL_WIDTH: u16 = 12;

/// Rows taken by everything except the user rows
const CHROME_ROWS: u16 = 9;

/// Data for the timeline view
#[derive(Debug)]
pub struct TimelineData {
    pub rows: Vec<TimelineRow>,
    /// `(min, max)` unix seconds over all spans
    pub range: Option<(i64, i64)>,
    pub types: Vec<String>,
}

impl TimelineData {
    pub fn from_subscriptions(subs: &[Subscription]) -> Self {
        let rows = Activity::timeline(subs);
        let mut types: Vec<String> = subs.iter().map(|s| s.kind.clone()).collect();
        types.sort();
        types.dedup();

        Self {
            rows,
            range: Activity::time_range(subs),
            types,
        }
    }

    /// Maximum scroll offset when `visible` rows fit on screen
    pub fn max_scroll_offset(&self, visible: usize) -> usize {
        self.rows.len().saturating_sub(visible)
    }
}

/// Map a timestamp onto a column in `0..width`, clamped
pub fn column_for(ts: i64, min: i64, max: i64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let last = width - 1;
    if max <= min {
        return 0;
    }
    // Spans may cover most of the i64 range, so stay in f64
    let ratio = (ts as f64 - min as f64) / (max as f64 - min as f64);
    let col = (ratio * last as f64).round();
    col.clamp(0.0, last as f64) as u16
}

/// Format unix seconds as a date label
pub fn date_label(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Number of user rows that fit in a view of `height` cells
pub fn visible_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS) as usize
}

pub struct TimelineView<'a> {
    data: &'a TimelineData,
    tabs: &'a [Tab],
    scroll_offset: usize,
    now: i64,
    theme: Theme,
}

impl<'a> TimelineView<'a> {
    pub fn new(data: &'a TimelineData, scroll_offset: usize, now: i64, theme: Theme) -> Self {
        Self {
            data,
            tabs: Tab::all(),
            scroll_offset,
            now,
            theme,
        }
    }

    pub fn with_tabs(mut self, tabs: &'a [Tab]) -> Self {
        self.tabs = tabs;
        self
    }
}

impl Widget for TimelineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = visible_rows(area.height) as u16;
        let chunks = Layout::vertical([
            Constraint::Length(1),    // Top padding
            Constraint::Length(1),    // Tabs
            Constraint::Length(1),    // Separator
            Constraint::Length(1),    // Title
            Constraint::Length(rows), // User rows
            Constraint::Length(1),    // Axis labels
            Constraint::Length(1),    // Legend
            Constraint::Length(1),    // Separator
            Constraint::Length(1),    // Keybindings
            Constraint::Min(0),
        ])
        .split(area);

        TabBar::new(self.tabs, Tab::Timeline, self.theme).render(chunks[1], buf);
        self.render_separator(chunks[2], buf);
        self.render_title(chunks[3], buf);

        match self.axis_range() {
            Some((min, max)) => {
                self.render_rows(chunks[4], buf, min, max);
                self.render_axis(chunks[5], buf, min, max);
            }
            None => {
                Paragraph::new("No subscriptions")
                    .style(Style::default().fg(self.theme.muted()))
                    .alignment(Alignment::Center)
                    .render(chunks[4], buf);
            }
        }

        Legend::new(&self.data.types, self.theme).render(chunks[6], buf);
        self.render_separator(chunks[7], buf);
        self.render_keybindings(chunks[8], buf);
    }
}

impl TimelineView<'_> {
    /// Data range widened to include the current date
    fn axis_range(&self) -> Option<(i64, i64)> {
        self.data
            .range
            .map(|(min, max)| (min.min(self.now), max.max(self.now)))
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &line, Style::default().fg(self.theme.muted()));
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled(
                "Subscription Periods",
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} users)", self.data.rows.len()),
                Style::default().fg(self.theme.muted()),
            ),
        ]);
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn plot_width(area: Rect) -> u16 {
        area.width.saturating_sub(LABEL_WIDTH)
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer, min: i64, max: i64) {
        let width = Self::plot_width(area);
        let plot_x = area.x + LABEL_WIDTH;
        let label_style = Style::default().fg(self.theme.date());
        let axis_style = Style::default().fg(self.theme.muted());

        let start = self.scroll_offset.min(self.data.rows.len());
        let end = (start + area.height as usize).min(self.data.rows.len());

        for (i, row) in self.data.rows[start..end].iter().enumerate() {
            let y = area.y + i as u16;
            let label = format!("{:>10}", row.user_id);
            buf.set_string(area.x, y, &label, label_style);
            buf.set_string(area.x + LABEL_WIDTH - 1, y, "│", axis_style);

            if width == 0 {
                continue;
            }
            for span in &row.spans {
                let lo = column_for(span.start.min(span.end), min, max, width);
                let hi = column_for(span.start.max(span.end), min, max, width);
                let bar = "█".repeat((hi - lo + 1) as usize);
                buf.set_string(
                    plot_x + lo,
                    y,
                    &bar,
                    Style::default().fg(self.theme.type_color(&span.kind)),
                );
            }
        }

        // Current date marker, drawn over the bars
        if width > 0 {
            let x = plot_x + column_for(self.now, min, max, width);
            let marker = Style::default().fg(self.theme.marker());
            for y in area.y..area.y + area.height {
                buf.set_string(x, y, "┃", marker);
            }
        }
    }

    fn render_axis(&self, area: Rect, buf: &mut Buffer, min: i64, max: i64) {
        let width = Self::plot_width(area);
        let style = Style::default().fg(self.theme.muted());
        buf.set_string(area.x, area.y, format!("{:>10}", "User ID"), style);

        let left = date_label(min);
        let right = date_label(max);
        let plot_x = area.x + LABEL_WIDTH;
        if width as usize >= left.len() + right.len() + 1 {
            buf.set_string(plot_x, area.y, &left, style);
            buf.set_string(
                plot_x + width - right.len() as u16,
                area.y,
                &right,
                style,
            );
        }

        let today = date_label(self.now);
        if width as usize > today.len() {
            let col = column_for(self.now, min, max, width);
            let x = col
                .saturating_sub(today.len() as u16 / 2)
                .min(width - today.len() as u16);
            buf.set_string(
                plot_x + x,
                area.y,
                &today,
                Style::default().fg(self.theme.marker()),
            );
        }
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(self.theme.accent());
        let desc = Style::default().fg(self.theme.muted());
        let line = Line::from(vec![
            Span::styled("Tab", key),
            Span::styled(": Switch  ", desc),
            Span::styled("↑↓/jk", key),
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
