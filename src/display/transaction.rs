//! Transaction display formatting

use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Bank")]
    bank: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format an amount with two decimal places and an explicit sign
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Render transactions as a table, in the given order
pub fn transactions_table<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> String {
    let rows: Vec<TransactionRow> = transactions
        .into_iter()
        .map(|t| TransactionRow {
            date: t.date.format("%Y-%m-%d").to_string(),
            bank: t.bank_name.clone(),
            account: t.account_name.clone(),
            label: t.label.clone(),
            amount: format_amount(t.total()),
        })
        .collect();

    if rows.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}
