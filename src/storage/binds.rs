//! Bind index
//!
//! Single owner of every transaction-to-group bind, with two mirror views
//! (by transaction, by group) so either side can enumerate its counterpart
//! in O(1). The mirrors hold copies of the same value-typed edges; the
//! symmetry between the three views is an invariant of every operation here.
//!
//! Persisted as a JSON array in `data/group_binds.json`. Binds reference
//! transactions and groups by string key only, so restored binds are
//! re-linked against the live stores at load time and stale edges are
//! dropped with a warning rather than aborting the load.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::models::{BindKind, GroupBind};
use crate::storage::groups::GroupStore;
use crate::storage::transactions::TransactionStore;

use super::file_io::{read_json, write_json_atomic};

/// Repository and index for the bind set
#[derive(Debug, Default)]
pub struct BindIndex {
    path: PathBuf,
    all: HashSet<GroupBind>,
    by_transaction: HashMap<String, HashSet<GroupBind>>,
    by_group: HashMap<String, HashSet<GroupBind>>,
}

impl BindIndex {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Load binds from disk and link them against the live stores
    ///
    /// Binds whose transaction or group no longer exists are dropped and
    /// returned so the caller can warn about them; persisted data can
    /// outlive its referents after manual edits.
    pub fn load(
        &mut self,
        transactions: &TransactionStore,
        groups: &GroupStore,
    ) -> MoneyManagerResult<Vec<GroupBind>> {
        let list: Vec<GroupBind> = read_json(&self.path)?;

        self.all.clear();
        self.by_transaction.clear();
        self.by_group.clear();

        let mut dangling = Vec::new();
        for bind in list {
            if !transactions.contains(&bind.transaction_id) || groups.get(&bind.group_name).is_none()
            {
                dangling.push(bind);
                continue;
            }
            self.add(bind);
        }
        Ok(dangling)
    }

    /// Save the whole bind set, sorted for stable diffs
    pub fn save(&self) -> MoneyManagerResult<()> {
        let mut list: Vec<&GroupBind> = self.all.iter().collect();
        list.sort_by(|a, b| {
            (&a.transaction_id, &a.group_name).cmp(&(&b.transaction_id, &b.group_name))
        });
        write_json_atomic(&self.path, &list)
    }

    /// Insert a bind into the set and both mirrors
    ///
    /// Set semantics: adding an existing (transaction, group) pair is a
    /// no-op and returns false, regardless of the bind's kind.
    pub fn add(&mut self, bind: GroupBind) -> bool {
        if !self.all.insert(bind.clone()) {
            return false;
        }
        self.by_transaction
            .entry(bind.transaction_id.clone())
            .or_default()
            .insert(bind.clone());
        self.by_group
            .entry(bind.group_name.clone())
            .or_default()
            .insert(bind);
        true
    }

    /// Remove a bind from the set and both mirrors
    pub fn remove(&mut self, bind: &GroupBind) -> MoneyManagerResult<()> {
        if !self.all.remove(bind) {
            return Err(MoneyManagerError::BindNotFound {
                transaction_id: bind.transaction_id.clone(),
                group_name: bind.group_name.clone(),
            });
        }

        if let Some(set) = self.by_transaction.get_mut(&bind.transaction_id) {
            set.remove(bind);
            if set.is_empty() {
                self.by_transaction.remove(&bind.transaction_id);
            }
        }
        if let Some(set) = self.by_group.get_mut(&bind.group_name) {
            set.remove(bind);
            if set.is_empty() {
                self.by_group.remove(&bind.group_name);
            }
        }
        Ok(())
    }

    pub fn contains(&self, bind: &GroupBind) -> bool {
        self.all.contains(bind)
    }

    /// Look up the stored bind for a (transaction, group) pair
    ///
    /// The stored bind carries the authoritative kind; the probe's kind is
    /// ignored by identity.
    pub fn get(&self, transaction_id: &str, group_name: &str) -> Option<&GroupBind> {
        self.all
            .get(&GroupBind::new(transaction_id, group_name, BindKind::Manual))
    }

    /// All binds for one transaction
    pub fn for_transaction(&self, transaction_id: &str) -> impl Iterator<Item = &GroupBind> {
        self.by_transaction
            .get(transaction_id)
            .into_iter()
            .flatten()
    }

    /// All binds for one group
    pub fn for_group(&self, group_name: &str) -> impl Iterator<Item = &GroupBind> {
        self.by_group.get(group_name).into_iter().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupBind> {
        self.all.iter()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Rewrite every bind of a renamed group
    ///
    /// Binds are keyed by name, so a group rename must propagate here.
    pub fn rename_group(&mut self, old_name: &str, new_name: &str) {
        let Some(binds) = self.by_group.remove(old_name) else {
            return;
        };

        let mut renamed = HashSet::with_capacity(binds.len());
        for bind in binds {
            self.all.remove(&bind);
            if let Some(set) = self.by_transaction.get_mut(&bind.transaction_id) {
                set.remove(&bind);
            }

            let bind = GroupBind::new(bind.transaction_id, new_name, bind.kind);
            self.all.insert(bind.clone());
            self.by_transaction
                .entry(bind.transaction_id.clone())
                .or_default()
                .insert(bind.clone());
            renamed.insert(bind);
        }
        self.by_group.insert(new_name.to_string(), renamed);
    }

    /// Drop every bind of a removed group, returning the removed edges
    pub fn remove_group(&mut self, group_name: &str) -> Vec<GroupBind> {
        let Some(binds) = self.by_group.remove(group_name) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(binds.len());
        for bind in binds {
            self.all.remove(&bind);
            if let Some(set) = self.by_transaction.get_mut(&bind.transaction_id) {
                set.remove(&bind);
                if set.is_empty() {
                    self.by_transaction.remove(&bind.transaction_id);
                }
            }
            removed.push(bind);
        }
        removed
    }
}
