//! CLI command handler for importing bank exports
//!
//! Accepts a single file or a directory of exports. Each file is ingested
//! independently so one unreadable export does not block the others; the
//! freshly imported transactions are then classified in one pass.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cli::autogroup::confirm_group_diff;
use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::readers::ReaderRegistry;
use crate::services::{auto_group, ingest, AutoGroupOptions, IngestOptions, IngestOutcome};
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(
    storage: &mut Storage,
    readers: &ReaderRegistry,
    path: &Path,
    options: &IngestOptions,
) -> MoneyManagerResult<()> {
    if !path.exists() {
        return Err(MoneyManagerError::Import(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    let mut new_ids: HashSet<String> = HashSet::new();
    for file in collect_files(path)? {
        match ingest(storage, readers, &file, options) {
            Ok(IngestOutcome::AlreadyImported) => {
                println!("The file '{}' seems to be already imported!", file.display());
            }
            Ok(IngestOutcome::Imported {
                new_ids: ids,
                updated,
                skipped,
            }) => {
                println!(
                    "Successfully imported the file '{}' with {} new transaction(s) ({} updated, {} skipped).",
                    file.display(),
                    ids.len(),
                    updated,
                    skipped
                );
                new_ids.extend(ids);
            }
            Err(e @ MoneyManagerError::NoMatchingReader { .. }) => {
                println!("{e}. Consider writing a reader for this format.");
            }
            // one bad export must not block the others
            Err(e) => eprintln!("Failed to import '{}': {e}", file.display()),
        }
    }

    if new_ids.is_empty() {
        println!("Not any new transaction found!");
    } else {
        let count = new_ids.len();
        let summary = auto_group(
            storage,
            &AutoGroupOptions {
                scope: Some(new_ids),
                ..Default::default()
            },
            confirm_group_diff,
        )?;

        if summary.is_empty() {
            println!("Imported {count} new transaction(s), but no group matched the new entries.");
        } else {
            println!(
                "Imported {count} new transaction(s)! Found {} bind(s) to add, for {} group(s).",
                summary.binds_added, summary.groups_updated
            );
        }
    }

    if !options.dry_run {
        storage.save_data()?;
    }
    Ok(())
}

/// Files to ingest: the path itself, or the direct children of a directory
/// (sorted by name so runs are deterministic)
fn collect_files(path: &Path) -> MoneyManagerResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(|e| MoneyManagerError::Import(format!("Failed to list {}: {e}", path.display())))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
