//! Export-file ingestion
//!
//! An export file is identified by the SHA-256 of its bytes, so a file that
//! was already ingested is recognized whatever it has been renamed to.
//! Parsing is delegated to the first registered reader whose sniff accepts
//! the file header; parsed transactions are merged into the store,
//! deduplicated by their reader-derived id.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::readers::ReaderRegistry;
use crate::storage::Storage;

/// Knobs for one ingestion run
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Refresh the label of transactions that already exist
    pub update_labels: bool,
    /// Copy the source file into the exports directory instead of moving it
    pub copy: bool,
    /// Reconcile in memory but leave the filesystem untouched
    pub dry_run: bool,
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The file's content fingerprint was already recorded
    AlreadyImported,
    /// The file was parsed and merged
    Imported {
        /// Ids of the transactions that did not exist before
        new_ids: Vec<String>,
        /// Existing transactions whose label was refreshed
        updated: usize,
        /// Existing transactions left as they were
        skipped: usize,
    },
}

/// Fingerprint of a file's full byte content
pub fn fingerprint(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Ingest one export file
///
/// The happy path mutates the transaction store and the import ledger and
/// files the source away under the exports directory; classification of the
/// new transactions is the caller's next step. `AlreadyImported` is an
/// expected outcome, not an error; `NoMatchingReader` is an error, but a
/// recoverable one the caller reports per file.
pub fn ingest(
    storage: &mut Storage,
    readers: &ReaderRegistry,
    path: &Path,
    options: &IngestOptions,
) -> MoneyManagerResult<IngestOutcome> {
    let content = std::fs::read(path)
        .map_err(|e| MoneyManagerError::Import(format!("Failed to read {}: {e}", path.display())))?;

    let fingerprint = fingerprint(&content);
    if storage.imports.contains(&fingerprint) {
        return Ok(IngestOutcome::AlreadyImported);
    }

    let Some(reader) = readers.detect(&content) else {
        return Err(MoneyManagerError::NoMatchingReader {
            file: path.display().to_string(),
        });
    };

    let mut new_ids = Vec::new();
    let mut updated = 0;
    let mut skipped = 0;
    for transaction in reader.read(&content)? {
        if storage.transactions.contains(&transaction.id) {
            if options.update_labels
                && storage
                    .transactions
                    .update_label(&transaction.id, &transaction.label)
            {
                updated += 1;
            } else {
                skipped += 1;
            }
        } else {
            new_ids.push(transaction.id.clone());
            storage.transactions.insert(transaction);
        }
    }

    if !options.dry_run {
        storage.imports.record(&fingerprint);
        file_away(path, storage, &fingerprint, options.copy)?;
    }

    Ok(IngestOutcome::Imported {
        new_ids,
        updated,
        skipped,
    })
}

/// Move (or copy) a processed export into the exports directory, embedding
/// the fingerprint in the name so a re-drop is obvious from a listing too
fn file_away(
    path: &Path,
    storage: &Storage,
    fingerprint: &str,
    copy: bool,
) -> MoneyManagerResult<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export");

    let target_name = if file_name.starts_with(fingerprint) {
        file_name.to_string()
    } else {
        format!("{fingerprint} - {file_name}")
    };
    let target = storage.paths().exports_dir().join(target_name);

    if copy {
        std::fs::copy(path, &target)
            .map_err(|e| MoneyManagerError::Import(format!("Failed to copy export: {e}")))?;
    } else if std::fs::rename(path, &target).is_err() {
        // rename fails across filesystems; fall back to copy + remove
        std::fs::copy(path, &target)
            .map_err(|e| MoneyManagerError::Import(format!("Failed to move export: {e}")))?;
        std::fs::remove_file(path)
            .map_err(|e| MoneyManagerError::Import(format!("Failed to remove source: {e}")))?;
    }
    Ok(())
}
