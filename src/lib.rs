//! Normalize subscription transactions from an accounts export and chart them

pub mod cli;
pub mod services;
pub mod tui;
pub mod types;
