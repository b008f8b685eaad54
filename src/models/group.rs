//! The on-disk form of the group hierarchy
//!
//! `groups.yml` is a user-authored document: a list of nested group nodes.
//! The in-memory arena lives in [`crate::storage::groups`]; this module only
//! defines the serialized shape.

use serde::{Deserialize, Serialize};

use crate::models::RawRule;

/// One node of the `groups.yml` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    /// Group name, unique across the whole hierarchy
    #[serde(rename = "group_name")]
    pub name: String,

    /// Nested subgroups, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subgroups: Vec<GroupNode>,

    /// Auto-classification rules; a bare list is an implicit AND
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RawRule>>,
}

impl GroupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subgroups: Vec::new(),
            rules: None,
        }
    }
}
