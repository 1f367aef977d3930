//! Activity service for chart-ready subscription statistics

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

use crate::types::Subscription;

/// Distinct active users per subscription type within one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyActive {
    /// First day of the month
    pub month: NaiveDate,
    pub counts: BTreeMap<String, u64>,
}

impl MonthlyActive {
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn count(&self, kind: &str) -> u64 {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn label(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSpan {
    pub start: i64,
    pub end: i64,
    pub kind: String,
}

/// All subscription spans of one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub user_id: i64,
    pub spans: Vec<TimelineSpan>,
}

/// Last instant counted by the monthly chart: two months past `now`
pub fn default_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(2)).unwrap_or(now)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Activity aggregator
pub struct Activity;

impl Activity {
    /// Count distinct users per (month, type).
    ///
    /// A subscription is active on `start`, `start + 1d`, ... up to `end`,
    /// keeping the time of day. Days after `cutoff` are not counted.
    /// Only months with at least one active day are returned, ascending.
    pub fn monthly(subs: &[Subscription], cutoff: DateTime<Utc>) -> Vec<MonthlyActive> {
        let mut users: HashMap<(NaiveDate, &str), HashSet<i64>> = HashMap::new();

        for sub in subs {
            let (Some(start), Some(end)) = (sub.start(), sub.end()) else {
                continue;
            };
            let last = end.min(cutoff);
            if last < start {
                continue;
            }

            let last_day = start + Duration::days((last - start).num_days());
            let last_month = month_start(last_day.date_naive());
            let mut month = month_start(start.date_naive());

            while month <= last_month {
                users
                    .entry((month, sub.kind.as_str()))
                    .or_default()
                    .insert(sub.user_id);
                match month.checked_add_months(Months::new(1)) {
                    Some(next) => month = next,
                    None => break,
                }
            }
        }

        let mut by_month: BTreeMap<NaiveDate, BTreeMap<String, u64>> = BTreeMap::new();
        for ((month, kind), ids) in users {
            by_month
                .entry(month)
                .or_default()
                .insert(kind.to_string(), ids.len() as u64);
        }

        by_month
            .into_iter()
            .map(|(month, counts)| MonthlyActive { month, counts })
            .collect()
    }

    /// Union of subscription types across months, sorted
    pub fn types(months: &[MonthlyActive]) -> Vec<String> {
        let set: BTreeSet<&String> = months.iter().flat_map(|m| m.counts.keys()).collect();
        set.into_iter().cloned().collect()
    }

    /// Group spans by user id (ascending), keeping input order within a user
    pub fn timeline(subs: &[Subscription]) -> Vec<TimelineRow> {
        let mut rows: BTreeMap<i64, Vec<TimelineSpan>> = BTreeMap::new();
        for sub in subs {
            rows.entry(sub.user_id).or_default().push(TimelineSpan {
                start: sub.start_date,
                end: sub.end_date,
                kind: sub.kind.clone(),
            });
        }

        rows.into_iter()
            .map(|(user_id, spans)| TimelineRow { user_id, spans })
            .collect()
    }

    /// Earliest and latest instant touched by any subscription
    pub fn time_range(subs: &[Subscription]) -> Option<(i64, i64)> {
        subs.iter().fold(None, |range, sub| {
            let lo = sub.start_date.min(sub.end_date);
            let hi = sub.start_date.max(sub.end_date);
            Some(match range {
                None => (lo, hi),
                Some((min, max)) => (min.min(lo), max.max(hi)),
            })
        })
    }
}
