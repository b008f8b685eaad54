//! CLI command handler for automatic grouping
//!
//! Bridges the reconciliation engine with the terminal: renders each
//! group's pending changes, asks for confirmation, and reports the summary.

use std::io::Write;

use crate::display::transactions_table;
use crate::error::MoneyManagerResult;
use crate::services::{auto_group, AutoGroupOptions, GroupDiff, GroupingSummary};
use crate::storage::Storage;

/// Handle the autogroup command
pub fn handle_autogroup_command(
    storage: &mut Storage,
    preview: bool,
    yes: bool,
    dry_run: bool,
) -> MoneyManagerResult<()> {
    let options = AutoGroupOptions {
        scope: None,
        preview,
        bypass_confirm: yes,
    };

    let summary = auto_group(storage, &options, confirm_group_diff)?;

    if summary.is_empty() {
        println!("Not any group to update.");
        return Ok(());
    }

    if preview {
        print_preview_warning(&summary);
        return Ok(());
    }

    print_summary(&summary);

    if !dry_run {
        storage.save_data()?;
    }
    Ok(())
}

/// Print the "stale binds" notice used by preview mode and by read-only
/// commands that want to surface pending changes
pub fn print_preview_warning(summary: &GroupingSummary) {
    println!(
        "Found {} bind(s) to add and {} bind(s) to remove, for {} group(s).",
        summary.binds_added, summary.binds_removed, summary.groups_updated
    );
    println!("Run 'moneymanager autogroup' to update your automatic groups.");
}

pub fn print_summary(summary: &GroupingSummary) {
    println!(
        "Detected {} bind(s) to add and {} bind(s) to remove, for {} group(s).",
        summary.binds_added, summary.binds_removed, summary.groups_updated
    );
}

/// Show a group's pending changes and ask for a y/n answer
pub fn confirm_group_diff(diff: &GroupDiff) -> bool {
    println!(
        "Auto grouping detected some changes for the group '{}'!",
        diff.group_name
    );

    if !diff.removed.is_empty() {
        println!("The following transactions will be unassigned:");
        println!("{}", transactions_table(diff.removed.iter().copied()));
    }
    if !diff.added.is_empty() {
        println!("The following transactions will be assigned:");
        println!("{}", transactions_table(diff.added.iter().copied()));
    }

    let accepted = ask_confirmation();
    if !accepted {
        println!("Aborted.");
    }
    accepted
}

fn ask_confirmation() -> bool {
    print!("Confirm? [y/N] ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
