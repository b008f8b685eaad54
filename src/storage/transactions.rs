//! Transaction store
//!
//! Owns the global transaction set, keyed by the reader-derived id.
//! Persisted as a JSON array in `data/transactions.json`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::MoneyManagerResult;
use crate::models::Transaction;

use super::file_io::{read_json, write_json_atomic};

/// Repository for the transaction set
#[derive(Debug, Default)]
pub struct TransactionStore {
    path: PathBuf,
    transactions: HashMap<String, Transaction>,
}

impl TransactionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            transactions: HashMap::new(),
        }
    }

    /// Load transactions from disk (missing file means an empty set)
    pub fn load(&mut self) -> MoneyManagerResult<()> {
        let list: Vec<Transaction> = read_json(&self.path)?;
        self.transactions = list.into_iter().map(|t| (t.id.clone(), t)).collect();
        Ok(())
    }

    /// Save the whole set to disk, sorted by (date, id) for stable diffs
    pub fn save(&self) -> MoneyManagerResult<()> {
        let mut list: Vec<&Transaction> = self.transactions.values().collect();
        list.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));
        write_json_atomic(&self.path, &list)
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.transactions.contains_key(id)
    }

    /// Insert a new transaction; returns false (and leaves the stored one
    /// untouched) when the id is already present
    pub fn insert(&mut self, transaction: Transaction) -> bool {
        match self.transactions.entry(transaction.id.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(transaction);
                true
            }
        }
    }

    /// Replace the label of an existing transaction
    ///
    /// Returns true when the transaction exists and the label changed.
    pub fn update_label(&mut self, id: &str, label: &str) -> bool {
        match self.transactions.get_mut(id) {
            Some(t) if t.label != label => {
                t.label = label.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
