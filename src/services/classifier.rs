//! Automatic grouping
//!
//! Runs every group's rule set against a transaction scope, diffs the
//! matches against the automatic binds that currently exist, and reconciles
//! the difference. Manual binds belong to the user and are never created,
//! removed, or altered here.

use std::collections::HashSet;

use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::models::{BindKind, GroupBind, Transaction};
use crate::storage::Storage;

/// Aggregate result of one reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingSummary {
    /// Groups with at least one detected change
    pub groups_updated: usize,
    /// Binds to create, summed over all groups
    pub binds_added: usize,
    /// Binds to drop, summed over all groups
    pub binds_removed: usize,
}

impl GroupingSummary {
    pub fn is_empty(&self) -> bool {
        self.groups_updated == 0
    }
}

/// How a reconciliation run behaves
#[derive(Debug, Clone, Default)]
pub struct AutoGroupOptions {
    /// Restrict matching to these transaction ids (e.g. freshly imported
    /// ones). Existing binds outside the scope are invisible to the diff,
    /// so they are never treated as removable. None means all transactions.
    pub scope: Option<HashSet<String>>,

    /// Report counts only, apply nothing
    pub preview: bool,

    /// Apply without asking (batch re-sync)
    pub bypass_confirm: bool,
}

/// The concrete changes for one group, handed to the confirmation gate
#[derive(Debug)]
pub struct GroupDiff<'a> {
    pub group_name: &'a str,
    pub added: Vec<&'a Transaction>,
    pub removed: Vec<&'a Transaction>,
}

/// Reconcile automatic binds for every group in the hierarchy
///
/// `confirm` is consulted once per changed group unless `preview` or
/// `bypass_confirm` is set; returning false applies nothing for that group
/// (a normal outcome, not an error). The summary counts detected changes
/// whether or not they were accepted.
pub fn auto_group(
    storage: &mut Storage,
    options: &AutoGroupOptions,
    mut confirm: impl FnMut(&GroupDiff) -> bool,
) -> MoneyManagerResult<GroupingSummary> {
    if options.preview && options.bypass_confirm {
        return Err(MoneyManagerError::InvalidModeCombination);
    }

    let Storage {
        groups,
        transactions,
        binds,
        ..
    } = storage;

    let in_scope =
        |id: &str| -> bool { options.scope.as_ref().map_or(true, |ids| ids.contains(id)) };

    let mut summary = GroupingSummary::default();

    for group in groups.all() {
        let Some(rule) = &group.rule else {
            continue;
        };

        let mut matches: HashSet<GroupBind> = HashSet::new();
        for transaction in transactions.iter() {
            if in_scope(&transaction.id) && rule.matches(transaction) {
                matches.insert(GroupBind::new(&transaction.id, &group.name, BindKind::Auto));
            }
        }

        let existing: HashSet<GroupBind> = binds
            .for_group(&group.name)
            .filter(|b| b.kind == BindKind::Auto && in_scope(&b.transaction_id))
            .cloned()
            .collect();

        let added: Vec<GroupBind> = matches.difference(&existing).cloned().collect();
        let removed: Vec<GroupBind> = existing.difference(&matches).cloned().collect();

        if added.is_empty() && removed.is_empty() {
            continue;
        }

        summary.groups_updated += 1;
        summary.binds_added += added.len();
        summary.binds_removed += removed.len();

        if options.preview {
            continue;
        }

        let accepted = options.bypass_confirm || {
            let diff = GroupDiff {
                group_name: &group.name,
                added: resolve(transactions, &added),
                removed: resolve(transactions, &removed),
            };
            confirm(&diff)
        };

        if accepted {
            for bind in added {
                binds.add(bind);
            }
            for bind in &removed {
                binds.remove(bind)?;
            }
        }
    }

    Ok(summary)
}

fn resolve<'a>(
    transactions: &'a crate::storage::TransactionStore,
    binds: &[GroupBind],
) -> Vec<&'a Transaction> {
    let mut list: Vec<&Transaction> = binds
        .iter()
        .filter_map(|b| transactions.get(&b.transaction_id))
        .collect();
    list.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Paths;
    use crate::models::{RawRule, RuleSet};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn tx(id: &str, label: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            bank_name: "B".to_string(),
            account_name: "A".to_string(),
            amount: Decimal::new(-1000, 2),
            label: label.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            fee: None,
        }
    }

    fn contains_rule(value: &str) -> RuleSet {
        RuleSet::compile(
            &[RawRule {
                kind: "contains".to_string(),
                key: Some("label".to_string()),
                value: Some(value.to_string()),
                rules: None,
            }],
            "test",
        )
        .unwrap()
    }

    /// Storage with group "Groceries" (rule: label contains MARKET) and
    /// transactions 1 (SUPERMARKET X) and 2 (RENT).
    fn setup() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        storage.groups.create("Groceries", None).unwrap();
        storage
            .groups
            .set_rule("Groceries", Some(contains_rule("MARKET")))
            .unwrap();
        storage.transactions.insert(tx("1", "SUPERMARKET X"));
        storage.transactions.insert(tx("2", "RENT"));
        (dir, storage)
    }

    fn no_confirm(_: &GroupDiff) -> bool {
        panic!("confirmation gate should not be reached")
    }

    #[test]
    fn test_bypass_applies_matching_binds() {
        let (_dir, mut storage) = setup();

        let options = AutoGroupOptions {
            bypass_confirm: true,
            ..Default::default()
        };
        let summary = auto_group(&mut storage, &options, no_confirm).unwrap();

        assert_eq!(summary.groups_updated, 1);
        assert_eq!(summary.binds_added, 1);
        assert_eq!(summary.binds_removed, 0);
        let bind = storage.binds.get("1", "Groceries").unwrap();
        assert_eq!(bind.kind, BindKind::Auto);
        assert!(storage.binds.get("2", "Groceries").is_none());
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions {
            bypass_confirm: true,
            ..Default::default()
        };

        auto_group(&mut storage, &options, no_confirm).unwrap();
        let second = auto_group(&mut storage, &options, no_confirm).unwrap();
        assert!(second.is_empty());
        assert_eq!(storage.binds.len(), 1);
    }

    #[test]
    fn test_rule_change_removes_stale_auto_binds() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions {
            bypass_confirm: true,
            ..Default::default()
        };
        auto_group(&mut storage, &options, no_confirm).unwrap();

        // the rule now matches nothing that exists
        storage
            .groups
            .set_rule("Groceries", Some(contains_rule("NOTHING")))
            .unwrap();

        let summary = auto_group(&mut storage, &options, no_confirm).unwrap();
        assert_eq!(summary.binds_removed, 1);
        assert_eq!(storage.binds.len(), 0);
    }

    #[test]
    fn test_manual_binds_are_untouched() {
        let (_dir, mut storage) = setup();
        // the user bound RENT manually; no rule matches it
        storage
            .binds
            .add(GroupBind::new("2", "Groceries", BindKind::Manual));

        let options = AutoGroupOptions {
            bypass_confirm: true,
            ..Default::default()
        };
        let summary = auto_group(&mut storage, &options, no_confirm).unwrap();

        assert_eq!(summary.binds_added, 1); // transaction 1 only
        assert_eq!(summary.binds_removed, 0);
        assert_eq!(storage.binds.get("2", "Groceries").unwrap().kind, BindKind::Manual);
    }

    #[test]
    fn test_scope_hides_out_of_scope_binds_from_removal() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions {
            bypass_confirm: true,
            ..Default::default()
        };
        auto_group(&mut storage, &options, no_confirm).unwrap();
        assert_eq!(storage.binds.len(), 1);

        // new import: transaction 3 matches; transaction 1's existing bind
        // is out of scope and must survive even though it is not re-matched
        storage.transactions.insert(tx("3", "MARKET AGAIN"));
        let options = AutoGroupOptions {
            scope: Some(HashSet::from(["3".to_string()])),
            bypass_confirm: true,
            ..Default::default()
        };
        let summary = auto_group(&mut storage, &options, no_confirm).unwrap();

        assert_eq!(summary.binds_added, 1);
        assert_eq!(summary.binds_removed, 0);
        assert!(storage.binds.get("1", "Groceries").is_some());
        assert!(storage.binds.get("3", "Groceries").is_some());
    }

    #[test]
    fn test_preview_applies_nothing() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions {
            preview: true,
            ..Default::default()
        };
        let summary = auto_group(&mut storage, &options, no_confirm).unwrap();

        assert_eq!(summary.groups_updated, 1);
        assert_eq!(summary.binds_added, 1);
        assert!(storage.binds.is_empty());
    }

    #[test]
    fn test_preview_and_bypass_is_a_programming_error() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions {
            preview: true,
            bypass_confirm: true,
            ..Default::default()
        };
        let err = auto_group(&mut storage, &options, no_confirm).unwrap_err();
        assert!(matches!(err, MoneyManagerError::InvalidModeCombination));
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions::default();

        let summary = auto_group(&mut storage, &options, |diff| {
            assert_eq!(diff.group_name, "Groceries");
            assert_eq!(diff.added.len(), 1);
            false
        })
        .unwrap();

        // detected but not applied
        assert_eq!(summary.binds_added, 1);
        assert!(storage.binds.is_empty());
    }

    #[test]
    fn test_confirmation_acceptance_applies() {
        let (_dir, mut storage) = setup();
        let options = AutoGroupOptions::default();

        auto_group(&mut storage, &options, |diff| {
            assert_eq!(diff.added[0].label, "SUPERMARKET X");
            true
        })
        .unwrap();
        assert_eq!(storage.binds.len(), 1);
    }
}
