//! TUI widgets

pub mod active;
pub mod help;
pub mod legend;
pub mod tabs;
pub mod timeline;
