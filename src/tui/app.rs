//! Application state and event loop

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::services::activity::{default_cutoff, Activity};
use crate::tui::theme::Theme;
use crate::types::Subscription;

use super::widgets::{
    active::{bars_that_fit, ActiveData, ActiveView},
    help::HelpPopup,
    tabs::Tab,
    timeline::{visible_rows, TimelineData, TimelineView},
};

/// Chart data derived from the normalized subscriptions
pub struct AppData {
    pub timeline: TimelineData,
    pub active: ActiveData,
    /// Unix seconds used for the current-date marker
    pub now: i64,
}

impl AppData {
    pub fn from_subscriptions(subs: &[Subscription], now: DateTime<Utc>) -> Self {
        Self {
            timeline: TimelineData::from_subscriptions(subs),
            active: ActiveData::from_monthly(Activity::monthly(subs, default_cutoff(now))),
            now: now.timestamp(),
        }
    }
}

/// Main application
pub struct App {
    data: AppData,
    tabs: Vec<Tab>,
    current_tab: Tab,
    theme: Theme,
    should_quit: bool,
    show_help: bool,
    timeline_scroll: usize,
    active_scroll: usize,
    viewport: (u16, u16),
}

impl App {
    /// Create an app showing `tabs`, starting on the first one
    pub fn new(data: AppData, tabs: Vec<Tab>, theme: Theme) -> Self {
        let tabs = if tabs.is_empty() {
            Tab::all().to_vec()
        } else {
            tabs
        };
        Self {
            data,
            current_tab: tabs[0],
            tabs,
            theme,
            should_quit: false,
            show_help: false,
            timeline_scroll: 0,
            active_scroll: 0,
            viewport: (80, 24),
        }
    }

    /// Record the terminal size used to clamp scrolling
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.timeline_scroll = self.timeline_scroll.min(self.max_timeline_scroll());
        self.active_scroll = self.active_scroll.min(self.max_active_scroll());
    }

    fn max_timeline_scroll(&self) -> usize {
        self.data
            .timeline
            .max_scroll_offset(visible_rows(self.viewport.1))
    }

    fn max_active_scroll(&self) -> usize {
        self.data
            .active
            .max_scroll_offset(bars_that_fit(self.viewport.0))
    }

    fn tab_index(&self) -> usize {
        self.tabs
            .iter()
            .position(|&t| t == self.current_tab)
            .unwrap_or(0)
    }

    fn next_tab(&mut self) {
        let i = (self.tab_index() + 1) % self.tabs.len();
        self.current_tab = self.tabs[i];
    }

    fn prev_tab(&mut self) {
        let i = (self.tab_index() + self.tabs.len() - 1) % self.tabs.len();
        self.current_tab = self.tabs[i];
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => self.next_tab(),
                    KeyCode::BackTab => self.prev_tab(),
                    KeyCode::Char(c @ '1'..='9') => {
                        let i = (c as u8 - b'1') as usize;
                        if let Some(&tab) = self.tabs.get(i) {
                            self.current_tab = tab;
                        }
                    }
                    KeyCode::Up | KeyCode::Char('k') if self.current_tab == Tab::Timeline => {
                        self.timeline_scroll = self.timeline_scroll.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') if self.current_tab == Tab::Timeline => {
                        self.timeline_scroll =
                            (self.timeline_scroll + 1).min(self.max_timeline_scroll());
                    }
                    // Active scroll counts months hidden on the right
                    KeyCode::Left | KeyCode::Char('h') if self.current_tab == Tab::Active => {
                        self.active_scroll = (self.active_scroll + 1).min(self.max_active_scroll());
                    }
                    KeyCode::Right | KeyCode::Char('l') if self.current_tab == Tab::Active => {
                        self.active_scroll = self.active_scroll.saturating_sub(1);
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.current_tab {
            Tab::Timeline => {
                TimelineView::new(
                    &self.data.timeline,
                    self.timeline_scroll,
                    self.data.now,
                    self.theme,
                )
                .with_tabs(&self.tabs)
                .render(area, buf);
            }
            Tab::Active => {
                ActiveView::new(&self.data.active, self.active_scroll, self.theme)
                    .with_tabs(&self.tabs)
                    .render(area, buf);
            }
        }

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Show the charts for `subs` until the user quits
pub fn run(subs: &[Subscription], tabs: Vec<Tab>) -> anyhow::Result<()> {
    // Theme detection must happen before raw mode
    let theme = Theme::detect();
    let data = AppData::from_subscriptions(subs, Utc::now());
    let mut app = App::new(data, tabs, theme);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_viewport(size.width, size.height);
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}
