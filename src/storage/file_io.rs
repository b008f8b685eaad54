//! File I/O utilities with atomic writes
//!
//! Program-managed data is JSON, user-authored config is YAML. Both are
//! whole-file documents: a write replaces the entire file via a temp file
//! and an atomic rename so a crash never leaves a half-written document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{MoneyManagerError, MoneyManagerResult};

/// Read a JSON document, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> MoneyManagerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        MoneyManagerError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        MoneyManagerError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Read a YAML document, returning a default value if the file is missing
/// or empty (a fresh config file may contain only comments)
pub fn read_yaml<T, P>(path: P) -> MoneyManagerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        MoneyManagerError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    if content.trim().is_empty()
        || content
            .lines()
            .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'))
    {
        return Ok(T::default());
    }

    serde_yaml::from_str(&content).map_err(|e| {
        MoneyManagerError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write a JSON document atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> MoneyManagerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| MoneyManagerError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write a YAML document atomically
pub fn write_yaml_atomic<T, P>(path: P, data: &T) -> MoneyManagerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_yaml::to_writer(writer, data)
            .map_err(|e| MoneyManagerError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

fn write_atomic(
    path: &Path,
    serialize: impl FnOnce(&mut BufWriter<File>) -> MoneyManagerResult<()>,
) -> MoneyManagerResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MoneyManagerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory, required for an atomic rename
    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| MoneyManagerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serialize(&mut writer)?;

    writer
        .flush()
        .map_err(|e| MoneyManagerError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| MoneyManagerError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        MoneyManagerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
