//! Path management for moneymanager
//!
//! Everything lives under one base directory, resolved in this order:
//!
//! 1. the `--path` command-line option
//! 2. the `MONEYMANAGER_PATH` environment variable
//! 3. the current working directory
//!
//! Layout under the base directory:
//!
//! ```text
//! .moneymanager.yml      optional settings (renames the entries below)
//! groups.yml             user-authored group hierarchy + rules
//! accounts.yml           user-authored account aliases + initial values
//! data/transactions.json
//! data/group_binds.json
//! data/imported_files.json
//! exports/               processed export files, renamed by fingerprint
//! ```

use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{MoneyManagerError, MoneyManagerResult};

/// Manages all paths used by moneymanager
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
    data_dirname: String,
    exports_dirname: String,
    groups_filename: String,
    accounts_filename: String,
}

impl Paths {
    /// Resolve the base directory from the option/environment/cwd chain
    pub fn new(base: Option<PathBuf>) -> MoneyManagerResult<Self> {
        let base_dir = match base {
            Some(path) => path,
            None => match std::env::var("MONEYMANAGER_PATH") {
                Ok(env_path) => PathBuf::from(env_path),
                Err(_) => std::env::current_dir()
                    .map_err(|e| MoneyManagerError::Config(format!("Cannot resolve cwd: {e}")))?,
            },
        };
        Ok(Self::with_base_dir(base_dir))
    }

    /// Create Paths with a fixed base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            data_dirname: "data".to_string(),
            exports_dirname: "exports".to_string(),
            groups_filename: "groups.yml".to_string(),
            accounts_filename: "accounts.yml".to_string(),
        }
    }

    /// Apply filename/dirname overrides from the settings file
    pub fn apply_settings(&mut self, settings: &Settings) {
        if let Some(name) = &settings.data_dirname {
            self.data_dirname = name.clone();
        }
        if let Some(name) = &settings.exports_dirname {
            self.exports_dirname = name.clone();
        }
        if let Some(name) = &settings.groups_filename {
            self.groups_filename = name.clone();
        }
        if let Some(name) = &settings.accounts_filename {
            self.accounts_filename = name.clone();
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Optional settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(".moneymanager.yml")
    }

    /// User-authored group hierarchy
    pub fn groups_file(&self) -> PathBuf {
        self.base_dir.join(&self.groups_filename)
    }

    /// User-authored account settings
    pub fn accounts_file(&self) -> PathBuf {
        self.base_dir.join(&self.accounts_filename)
    }

    /// Program-managed data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(&self.data_dirname)
    }

    /// Processed exports directory
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join(&self.exports_dirname)
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn binds_file(&self) -> PathBuf {
        self.data_dir().join("group_binds.json")
    }

    pub fn imports_file(&self) -> PathBuf {
        self.data_dir().join("imported_files.json")
    }

    /// Create the data and exports directories if missing
    pub fn ensure_directories(&self) -> MoneyManagerResult<()> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MoneyManagerError::Io(format!("Failed to create data directory: {e}")))?;
        std::fs::create_dir_all(self.exports_dir()).map_err(|e| {
            MoneyManagerError::Io(format!("Failed to create exports directory: {e}"))
        })?;
        Ok(())
    }

    /// Create missing config files with a pointer comment, plus directories
    pub fn init_files(&self) -> MoneyManagerResult<()> {
        self.ensure_directories()?;

        let stubs = [
            (
                self.groups_file(),
                "# Group hierarchy and auto-grouping rules.\n",
            ),
            (
                self.accounts_file(),
                "# Account aliases and initial values.\n",
            ),
        ];
        for (path, stub) in stubs {
            if !path.exists() {
                std::fs::write(&path, stub).map_err(|e| {
                    MoneyManagerError::Io(format!("Failed to create {}: {e}", path.display()))
                })?;
            }
        }
        Ok(())
    }
}
