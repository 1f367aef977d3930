//! Account export types (input side)

use serde::{Deserialize, Serialize};

use super::{Result, SubreportError};

/// One entry of the accounts export: `{ key, value }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// User id, stored as a string by the export
    pub key: String,
    pub value: AccountValue,
}

impl Account {
    /// Parse the account key as an integer user id.
    /// Surrounding whitespace and a leading sign are accepted.
    pub fn user_id(&self) -> Result<i64> {
        let trimmed = self.key.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| SubreportError::InvalidUserId(self.key.clone()))
    }

    /// Account public key. Only required once the account has transactions.
    pub fn pubkey(&self) -> Result<&str> {
        self.value
            .pubkey
            .as_deref()
            .ok_or_else(|| SubreportError::MissingPubkey(self.key.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    /// `None` when the field is missing or null
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
}

/// A purchase or renewal event as stored in the account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub purchased_date: Option<i64>,
    /// Seconds of entitlement (LN only)
    #[serde(default)]
    pub duration: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with_key(key: &str) -> Account {
        Account {
            key: key.to_string(),
            value: AccountValue {
                pubkey: Some("pk".to_string()),
                transactions: None,
            },
        }
    }

    #[test]
    fn test_user_id_plain() {
        assert_eq!(account_with_key("5").user_id().unwrap(), 5);
    }

    #[test]
    fn test_user_id_whitespace_and_sign() {
        assert_eq!(account_with_key(" 42 ").user_id().unwrap(), 42);
        assert_eq!(account_with_key("+7").user_id().unwrap(), 7);
        assert_eq!(account_with_key("-3").user_id().unwrap(), -3);
    }

    #[test]
    fn test_user_id_invalid() {
        let err = account_with_key("abc").user_id().unwrap_err();
        assert!(matches!(err, SubreportError::InvalidUserId(ref k) if k == "abc"));
    }

    #[test]
    fn test_user_id_empty() {
        assert!(account_with_key("").user_id().is_err());
    }

    #[test]
    fn test_deserialize_missing_transactions() {
        let json = r#"{"key":"1","value":{"pubkey":"pk1"}}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.value.transactions.is_none());
    }

    #[test]
    fn test_deserialize_missing_pubkey_without_transactions() {
        let json = r#"{"key":"3","value":{"expiry":1700000000}}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.value.pubkey.is_none());
        assert!(account.value.transactions.is_none());
    }

    #[test]
    fn test_pubkey_accessor() {
        assert_eq!(account_with_key("5").pubkey().unwrap(), "pk");

        let mut account = account_with_key("5");
        account.value.pubkey = None;
        let err = account.pubkey().unwrap_err();
        assert!(matches!(err, SubreportError::MissingPubkey(ref k) if k == "5"));
    }

    #[test]
    fn test_deserialize_null_transactions() {
        let json = r#"{"key":"1","value":{"pubkey":"pk1","transactions":null}}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.value.transactions.is_none());
    }

    #[test]
    fn test_deserialize_transaction_nulls_and_extra_fields() {
        let json = r#"{
            "type": "ln",
            "id": "checkout-1",
            "start_date": null,
            "end_date": null,
            "purchased_date": 1000,
            "duration": 2592000
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind, "ln");
        assert_eq!(tx.start_date, None);
        assert_eq!(tx.end_date, None);
        assert_eq!(tx.purchased_date, Some(1000));
        assert_eq!(tx.duration, Some(2592000));
    }

    #[test]
    fn test_deserialize_transaction_missing_fields() {
        let tx: Transaction = serde_json::from_str(r#"{"type":"iap"}"#).unwrap();
        assert_eq!(tx, Transaction {
            kind: "iap".to_string(),
            ..Default::default()
        });
    }

    #[test]
    fn test_deserialize_account_ignores_expiry() {
        let json = r#"{"key":"9","value":{"pubkey":"pk9","expiry":1700000000,"transactions":[]}}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.value.transactions, Some(Vec::new()));
    }
}
