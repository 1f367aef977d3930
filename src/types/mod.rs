//! Type definitions for subreport

mod account;
mod error;
mod subscription;

pub use account::*;
pub use error::*;
pub use subscription::*;
