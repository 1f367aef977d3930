//! Services for normalization, persistence and chart data

pub mod activity;
pub mod normalizer;
pub mod store;

pub use activity::Activity;
pub use normalizer::{normalize, normalize_accounts, NormalizeReport, RejectionStats};
pub use store::Store;
