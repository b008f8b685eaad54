//! CLI command handler for listing transactions

use chrono::NaiveDate;

use crate::cli::autogroup::print_preview_warning;
use crate::display::transactions_table;
use crate::error::MoneyManagerResult;
use crate::models::Transaction;
use crate::services::{auto_group, AutoGroupOptions};
use crate::storage::Storage;

/// Handle the transactions command
///
/// `after` is inclusive, `before` is exclusive.
pub fn handle_transactions_command(
    storage: &mut Storage,
    before: Option<NaiveDate>,
    after: Option<NaiveDate>,
) -> MoneyManagerResult<()> {
    // surface stale automatic binds without touching anything
    let summary = auto_group(
        storage,
        &AutoGroupOptions {
            preview: true,
            ..Default::default()
        },
        |_| false,
    )?;
    if !summary.is_empty() {
        print_preview_warning(&summary);
        println!();
    }

    let mut list: Vec<&Transaction> = storage
        .transactions
        .iter()
        .filter(|t| before.map_or(true, |d| t.date < d))
        .filter(|t| after.map_or(true, |d| t.date >= d))
        .collect();
    list.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));

    println!("{}", transactions_table(list));
    Ok(())
}
