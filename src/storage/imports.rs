//! Ingested-file ledger
//!
//! Records the content fingerprint of every export file ever ingested so a
//! re-dropped file is recognized by content, whatever its name. Persisted
//! as a plain JSON list in `data/imported_files.json`, in ingestion order.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::MoneyManagerResult;

use super::file_io::{read_json, write_json_atomic};

/// Repository for ingested-file fingerprints
#[derive(Debug, Default)]
pub struct ImportLedger {
    path: PathBuf,
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ImportLedger {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn load(&mut self) -> MoneyManagerResult<()> {
        self.order = read_json(&self.path)?;
        self.seen = self.order.iter().cloned().collect();
        Ok(())
    }

    pub fn save(&self) -> MoneyManagerResult<()> {
        write_json_atomic(&self.path, &self.order)
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.seen.contains(fingerprint)
    }

    /// Record a fingerprint; duplicates are ignored
    pub fn record(&mut self, fingerprint: &str) {
        if self.seen.insert(fingerprint.to_string()) {
            self.order.push(fingerprint.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
