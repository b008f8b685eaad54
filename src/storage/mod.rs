//! Storage layer for moneymanager
//!
//! Program-managed data (transactions, binds, ingested fingerprints) lives
//! in JSON files under `data/` and is rewritten wholesale at the end of a
//! command. The group hierarchy is user-authored YAML and is only written
//! back by explicit group mutations.

pub mod binds;
pub mod file_io;
pub mod groups;
pub mod imports;
pub mod transactions;

pub use binds::BindIndex;
pub use file_io::{read_json, read_yaml, write_json_atomic, write_yaml_atomic};
pub use groups::{Group, GroupStore};
pub use imports::ImportLedger;
pub use transactions::TransactionStore;

use crate::config::paths::Paths;
use crate::error::MoneyManagerResult;
use crate::models::GroupBind;

/// Application state: every store, constructed once per command invocation
/// and passed by reference to the services
pub struct Storage {
    paths: Paths,
    pub groups: GroupStore,
    pub transactions: TransactionStore,
    pub binds: BindIndex,
    pub imports: ImportLedger,
}

impl Storage {
    pub fn new(paths: Paths) -> MoneyManagerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            groups: GroupStore::new(paths.groups_file()),
            transactions: TransactionStore::new(paths.transactions_file()),
            binds: BindIndex::new(paths.binds_file()),
            imports: ImportLedger::new(paths.imports_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Load everything from disk
    ///
    /// Order matters: binds can only be linked once the groups and
    /// transactions they reference are live. Returns the binds dropped
    /// because their referents vanished, for the caller to warn about.
    pub fn load_all(&mut self) -> MoneyManagerResult<Vec<GroupBind>> {
        self.groups.load()?;
        self.transactions.load()?;
        self.imports.load()?;
        self.binds.load(&self.transactions, &self.groups)
    }

    /// Save the program-managed data files
    pub fn save_data(&self) -> MoneyManagerResult<()> {
        self.transactions.save()?;
        self.binds.save()?;
        self.imports.save()?;
        Ok(())
    }

    /// Save the user-authored group hierarchy
    pub fn save_groups(&self) -> MoneyManagerResult<()> {
        self.groups.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BindKind, Transaction};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn tx(id: &str, label: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            bank_name: "B".to_string(),
            account_name: "A".to_string(),
            amount: Decimal::new(-500, 2),
            label: label.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            fee: None,
        }
    }

    #[test]
    fn test_new_creates_directories() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let _storage = Storage::new(paths).unwrap();

        assert!(dir.path().join("data").exists());
        assert!(dir.path().join("exports").exists());
    }

    #[test]
    fn test_save_and_reload_full_state() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("groups.yml"), "- group_name: Food\n").unwrap();

        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();

        storage.transactions.insert(tx("t1", "MARKET"));
        storage
            .binds
            .add(GroupBind::new("t1", "Food", BindKind::Manual));
        storage.imports.record("fp1");
        storage.save_data().unwrap();

        let mut storage2 = Storage::new(paths).unwrap();
        let dropped = storage2.load_all().unwrap();
        assert!(dropped.is_empty());
        assert_eq!(storage2.transactions.len(), 1);
        assert_eq!(storage2.binds.len(), 1);
        assert!(storage2.imports.contains("fp1"));
    }

    #[test]
    fn test_load_drops_dangling_binds() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("groups.yml"), "- group_name: Food\n").unwrap();

        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();
        storage.transactions.insert(tx("t1", "MARKET"));
        storage
            .binds
            .add(GroupBind::new("t1", "Food", BindKind::Manual));
        storage
            .binds
            .add(GroupBind::new("ghost", "Food", BindKind::Auto));
        storage.save_data().unwrap();

        // "ghost" was never a stored transaction, so the reload drops its bind
        let mut storage2 = Storage::new(paths).unwrap();
        let dropped = storage2.load_all().unwrap();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].transaction_id, "ghost");
        assert_eq!(storage2.binds.len(), 1);
    }
}
