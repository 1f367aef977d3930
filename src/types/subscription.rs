//! Normalized subscription record (output side)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    /// Unix seconds
    pub start_date: i64,
    /// Unix seconds, not guaranteed to be after `start_date`
    pub end_date: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: i64,
    pub pubkey: String,
}

impl Subscription {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_date, 0)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.end_date, 0)
    }
}
