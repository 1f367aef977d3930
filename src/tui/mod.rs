//! Terminal charts for normalized subscriptions

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::run;
pub use widgets::tabs::Tab;
