//! Transaction model
//!
//! A transaction's identity is its `id`, a content-derived key assigned by
//! the reader that parsed it from a bank export. The id is never reassigned,
//! so re-importing the same export resolves to the same transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single bank transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Content-derived identifier from the reader, stable across re-imports
    pub id: String,

    /// Name of the bank this transaction belongs to
    #[serde(rename = "bank")]
    pub bank_name: String,

    /// Name of the account within the bank
    #[serde(rename = "account")]
    pub account_name: String,

    /// Signed amount (negative for outflow)
    pub amount: Decimal,

    /// Human-readable label; the only field that may change after import
    pub label: String,

    /// Date the transaction was recorded
    pub date: NaiveDate,

    /// Optional fee charged on top of the amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
}

impl Transaction {
    /// Total cost of the transaction including any fee
    pub fn total(&self) -> Decimal {
        self.amount + self.fee.unwrap_or_default()
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl std::hash::Hash for Transaction {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.label, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample(id: &str, label: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            bank_name: "TestBank".to_string(),
            account_name: "Checking".to_string(),
            amount: Decimal::from_str("-12.50").unwrap(),
            label: label.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            fee: None,
        }
    }

    #[test]
    fn test_identity_is_id_only() {
        let a = sample("t1", "COFFEE");
        let mut b = sample("t1", "SOMETHING ELSE");
        b.amount = Decimal::ZERO;
        assert_eq!(a, b);

        let c = sample("t2", "COFFEE");
        assert_ne!(a, c);
    }

    #[test]
    fn test_total_includes_fee() {
        let mut t = sample("t1", "TRANSFER");
        assert_eq!(t.total(), Decimal::from_str("-12.50").unwrap());
        t.fee = Some(Decimal::from_str("-0.35").unwrap());
        assert_eq!(t.total(), Decimal::from_str("-12.85").unwrap());
    }

    #[test]
    fn test_serialization_uses_short_keys() {
        let t = sample("t1", "COFFEE");
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"bank\":\"TestBank\""));
        assert!(json.contains("\"account\":\"Checking\""));
        assert!(!json.contains("fee"));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.amount, t.amount);
    }
}
