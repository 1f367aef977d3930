//! Subscription normalization service
//!
//! Flattens account transactions into [`Subscription`] records, deriving
//! missing start and end dates and gating out transactions that cannot be
//! placed on a timeline.

use std::fmt;

use crate::types::{Account, Result, Subscription, Transaction};

/// Year 2100 as unix seconds
pub const YEAR_2100: i64 = 4_102_473_600;

/// Upper bound for an accepted end date
pub const END_DATE_LIMIT: i64 = YEAR_2100 * 2;

/// Transaction after date derivation, with `duration` and `purchased_date` dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTransaction {
    pub kind: String,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

impl NormalizedTransaction {
    /// Derive missing dates from `purchased_date` and `duration`.
    ///
    /// - `start_date` falls back to `purchased_date`
    /// - `end_date` falls back to `start_date + duration` (saturating)
    pub fn derive(tx: &Transaction) -> Self {
        let start_date = tx.start_date.or(tx.purchased_date);
        let end_date = match (tx.end_date, tx.duration, start_date) {
            (Some(end), _, _) => Some(end),
            (None, Some(duration), Some(start)) => Some(start.saturating_add(duration)),
            _ => None,
        };

        Self {
            kind: tx.kind.clone(),
            start_date,
            end_date,
        }
    }
}

impl fmt::Display for NormalizedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<i64>| v.map_or_else(|| "null".to_string(), |n| n.to_string());
        write!(
            f,
            "{{type: {:?}, start_date: {}, end_date: {}}}",
            self.kind,
            show(self.start_date),
            show(self.end_date)
        )
    }
}

/// Why a transaction was excluded from output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Derived end date is beyond [`END_DATE_LIMIT`]
    EndDateOutOfRange { end_date: i64 },
    /// Start or end date still absent after derivation
    MissingDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub user_id: i64,
    pub transaction: NormalizedTransaction,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectReason::EndDateOutOfRange { .. } => {
                write!(f, "{} has bad end date", self.transaction)
            }
            RejectReason::MissingDate => {
                write!(f, "missing start or end date in {}", self.transaction)
            }
        }
    }
}

/// Result of normalizing a single transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(Subscription),
    Rejected(Rejection),
}

/// Normalize one transaction of the account identified by `user_id` / `pubkey`
pub fn normalize_transaction(user_id: i64, pubkey: &str, tx: &Transaction) -> Outcome {
    let normalized = NormalizedTransaction::derive(tx);

    if let Some(end_date) = normalized.end_date {
        if end_date > END_DATE_LIMIT {
            return Outcome::Rejected(Rejection {
                user_id,
                transaction: normalized,
                reason: RejectReason::EndDateOutOfRange { end_date },
            });
        }
    }

    match (normalized.start_date, normalized.end_date) {
        (Some(start_date), Some(end_date)) => Outcome::Accepted(Subscription {
            start_date,
            end_date,
            kind: normalized.kind,
            user_id,
            pubkey: pubkey.to_string(),
        }),
        _ => Outcome::Rejected(Rejection {
            user_id,
            transaction: normalized,
            reason: RejectReason::MissingDate,
        }),
    }
}

/// Accepted subscriptions and rejected transactions, both in traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub subscriptions: Vec<Subscription>,
    pub rejections: Vec<Rejection>,
}

impl NormalizeReport {
    pub fn stats(&self) -> RejectionStats {
        RejectionStats::from_rejections(&self.rejections)
    }
}

/// Normalize every transaction of every account.
///
/// Accounts without a `transactions` field are skipped entirely, without
/// parsing their key. A non-integer key or a missing pubkey on any other
/// account is fatal.
pub fn normalize_accounts(accounts: &[Account]) -> Result<NormalizeReport> {
    let mut report = NormalizeReport::default();

    for account in accounts {
        let Some(transactions) = &account.value.transactions else {
            continue;
        };

        let user_id = account.user_id()?;
        let pubkey = account.pubkey()?;

        for tx in transactions {
            match normalize_transaction(user_id, pubkey, tx) {
                Outcome::Accepted(sub) => report.subscriptions.push(sub),
                Outcome::Rejected(rejection) => report.rejections.push(rejection),
            }
        }
    }

    Ok(report)
}

/// Normalize accounts, logging each rejected transaction to stderr
pub fn normalize(accounts: &[Account]) -> Result<Vec<Subscription>> {
    let report = normalize_accounts(accounts)?;
    for rejection in &report.rejections {
        tracing::warn!(user_id = rejection.user_id, "{}", rejection);
    }
    tracing::debug!(
        accepted = report.subscriptions.len(),
        rejected = report.rejections.len(),
        "normalized accounts"
    );
    Ok(report.subscriptions)
}

/// Rejection counts by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionStats {
    pub end_date_out_of_range: usize,
    pub missing_date: usize,
}

impl RejectionStats {
    pub fn from_rejections(rejections: &[Rejection]) -> Self {
        rejections.iter().fold(Self::default(), |mut stats, r| {
            match r.reason {
                RejectReason::EndDateOutOfRange { .. } => stats.end_date_out_of_range += 1,
                RejectReason::MissingDate => stats.missing_date += 1,
            }
            stats
        })
    }

    pub fn total(&self) -> usize {
        self.end_date_out_of_range + self.missing_date
    }
}
