//! CLI command handler for the accounts overview
//!
//! Aggregates transaction totals per (bank, account), applying the aliases
//! and initial values from `accounts.yml`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::AccountsSettings;
use crate::display::format_amount;
use crate::error::MoneyManagerResult;
use crate::storage::Storage;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Bank")]
    bank: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Handle the accounts command
pub fn handle_accounts_command(
    storage: &Storage,
    settings: &AccountsSettings,
) -> MoneyManagerResult<()> {
    let mut balances: BTreeMap<(String, String), Decimal> = BTreeMap::new();
    for transaction in storage.transactions.iter() {
        *balances
            .entry((
                transaction.bank_name.clone(),
                transaction.account_name.clone(),
            ))
            .or_default() += transaction.total();
    }

    if balances.is_empty() {
        println!("No accounts yet. Import an export first.");
        return Ok(());
    }

    let mut total = Decimal::ZERO;
    let mut rows = Vec::with_capacity(balances.len() + 1);
    for ((bank, account), amount) in &balances {
        let balance = *amount + settings.initial_value(bank, account);
        total += balance;
        rows.push(AccountRow {
            bank: bank.clone(),
            account: settings.alias(bank, account).to_string(),
            balance: format_amount(balance),
        });
    }
    rows.push(AccountRow {
        bank: String::new(),
        account: "Total".to_string(),
        balance: format_amount(total),
    });

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
    Ok(())
}
