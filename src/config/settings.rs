//! Optional settings file
//!
//! `.moneymanager.yml` in the base directory can rename the standard files
//! and directories. Every entry is optional; a missing file means defaults.

use serde::{Deserialize, Serialize};

use crate::config::paths::Paths;
use crate::error::MoneyManagerResult;
use crate::storage::file_io::read_yaml;

/// Settings loaded from `.moneymanager.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory for the program-managed JSON files (default `data`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dirname: Option<String>,

    /// Directory for processed export files (default `exports`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports_dirname: Option<String>,

    /// Group hierarchy file (default `groups.yml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_filename: Option<String>,

    /// Account settings file (default `accounts.yml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts_filename: Option<String>,
}

impl Settings {
    /// Load the settings file, defaulting when absent
    pub fn load(paths: &Paths) -> MoneyManagerResult<Self> {
        read_yaml(paths.settings_file())
    }
}
