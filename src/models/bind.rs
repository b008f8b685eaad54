//! Transaction-to-group binds
//!
//! A bind is a value-typed edge between a transaction and a group, keyed by
//! their string identifiers. Identity is the pair only: a transaction cannot
//! be bound twice to the same group, even with different kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// How a bind came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindKind {
    /// Created explicitly by the user; never touched by reclassification
    Manual,
    /// Created by the classifier; owned entirely by it
    Auto,
}

/// An edge between a transaction and a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupBind {
    pub transaction_id: String,
    pub group_name: String,
    #[serde(rename = "type")]
    pub kind: BindKind,
}

impl GroupBind {
    pub fn new(
        transaction_id: impl Into<String>,
        group_name: impl Into<String>,
        kind: BindKind,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            group_name: group_name.into(),
            kind,
        }
    }
}

// Equality and hashing deliberately ignore `kind`: the (transaction, group)
// pair is the bind's identity.
impl PartialEq for GroupBind {
    fn eq(&self, other: &Self) -> bool {
        self.transaction_id == other.transaction_id && self.group_name == other.group_name
    }
}

impl Eq for GroupBind {}

impl Hash for GroupBind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transaction_id.hash(state);
        self.group_name.hash(state);
    }
}

impl fmt::Display for GroupBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.transaction_id, self.group_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_kind() {
        let manual = GroupBind::new("t1", "Food", BindKind::Manual);
        let auto = GroupBind::new("t1", "Food", BindKind::Auto);
        assert_eq!(manual, auto);

        let mut set = HashSet::new();
        assert!(set.insert(manual));
        assert!(!set.insert(auto));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_distinct_pairs_are_distinct() {
        let a = GroupBind::new("t1", "Food", BindKind::Auto);
        let b = GroupBind::new("t1", "Rent", BindKind::Auto);
        let c = GroupBind::new("t2", "Food", BindKind::Auto);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let bind = GroupBind::new("t1", "Food", BindKind::Auto);
        let json = serde_json::to_string(&bind).unwrap();
        assert!(json.contains("\"type\":\"auto\""));

        let back: GroupBind = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, BindKind::Auto);
    }
}
