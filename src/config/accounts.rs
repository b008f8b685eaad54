//! Account settings
//!
//! `accounts.yml` is a user-authored document with per-bank account aliases
//! (display names for cryptic export account labels) and initial values
//! (balance offsets for history that predates the first imported export).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::paths::Paths;
use crate::error::MoneyManagerResult;
use crate::storage::file_io::read_yaml;

/// The `accounts.yml` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountsSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<BankAliases>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_values: Vec<BankInitialValues>,
}

/// Aliases for one bank's accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAliases {
    pub bank: String,
    pub values: Vec<AccountAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountAlias {
    /// Account name as it appears in the export
    pub input: String,
    /// Name to display instead
    pub output: String,
}

/// Initial values for one bank's accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankInitialValues {
    pub bank: String,
    pub values: Vec<AccountInitialValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInitialValue {
    pub account: String,
    pub value: Decimal,
}

impl AccountsSettings {
    /// Load `accounts.yml`, defaulting when absent
    pub fn load(paths: &Paths) -> MoneyManagerResult<Self> {
        read_yaml(paths.accounts_file())
    }

    /// Display name for an account, falling back to the export name
    pub fn alias<'a>(&'a self, bank: &str, account: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|b| b.bank == bank)
            .and_then(|b| b.values.iter().find(|a| a.input == account))
            .map(|a| a.output.as_str())
            .unwrap_or(account)
    }

    /// Balance offset for an account, zero when unset
    pub fn initial_value(&self, bank: &str, account: &str) -> Decimal {
        self.initial_values
            .iter()
            .find(|b| b.bank == bank)
            .and_then(|b| b.values.iter().find(|a| a.account == account))
            .map(|a| a.value)
            .unwrap_or_default()
    }
}
