//! Group hierarchy store
//!
//! The hierarchy is an arena keyed by group name: parents and children are
//! stored as names, never as references, so rename and delete cannot leave
//! dangling pointers. Names are unique across the entire forest, not just
//! among siblings.
//!
//! The document form (`groups.yml`) is user-authored YAML; it is only
//! rewritten by explicit mutations (create, rename, delete).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::models::{GroupNode, RuleSet};
use crate::storage::binds::BindIndex;

use super::file_io::{read_yaml, write_yaml_atomic};

/// One group in the arena
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    /// Parent group name; None for roots
    pub parent: Option<String>,
    /// Child group names, in document order
    pub subgroups: Vec<String>,
    /// Compiled auto-classification rules, if any
    pub rule: Option<RuleSet>,
}

/// Repository for the group hierarchy
#[derive(Debug, Default)]
pub struct GroupStore {
    path: PathBuf,
    arena: HashMap<String, Group>,
    roots: Vec<String>,
}

impl GroupStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Load the hierarchy from `groups.yml`
    pub fn load(&mut self) -> MoneyManagerResult<()> {
        let nodes: Vec<GroupNode> = read_yaml(&self.path)?;
        self.arena.clear();
        self.roots.clear();
        for node in &nodes {
            self.insert_node(node, None)?;
            self.roots.push(node.name.clone());
        }
        Ok(())
    }

    /// Write the hierarchy back to `groups.yml`
    pub fn save(&self) -> MoneyManagerResult<()> {
        let nodes: Vec<GroupNode> = self.roots.iter().map(|name| self.to_node(name)).collect();
        write_yaml_atomic(&self.path, &nodes)
    }

    fn insert_node(&mut self, node: &GroupNode, parent: Option<&str>) -> MoneyManagerResult<()> {
        if self.arena.contains_key(&node.name) {
            return Err(MoneyManagerError::duplicate_group(&node.name));
        }

        let rule = match &node.rules {
            Some(raw) => Some(RuleSet::compile(raw, &node.name)?),
            None => None,
        };

        self.arena.insert(
            node.name.clone(),
            Group {
                name: node.name.clone(),
                parent: parent.map(str::to_string),
                subgroups: node.subgroups.iter().map(|s| s.name.clone()).collect(),
                rule,
            },
        );

        for sub in &node.subgroups {
            self.insert_node(sub, Some(&node.name))?;
        }
        Ok(())
    }

    fn to_node(&self, name: &str) -> GroupNode {
        let group = &self.arena[name];
        GroupNode {
            name: group.name.clone(),
            subgroups: group.subgroups.iter().map(|s| self.to_node(s)).collect(),
            rules: group.rule.as_ref().map(RuleSet::to_raw),
        }
    }

    /// Soft lookup by name
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.arena.get(name)
    }

    /// Hard lookup by name; the caller asserts the group must exist
    pub fn require(&self, name: &str) -> MoneyManagerResult<&Group> {
        self.arena
            .get(name)
            .ok_or_else(|| MoneyManagerError::group_not_found(name))
    }

    /// Names of the root groups, in document order
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Create a new group under the given parent (or at the root)
    pub fn create(&mut self, name: &str, parent: Option<&str>) -> MoneyManagerResult<()> {
        if self.arena.contains_key(name) {
            return Err(MoneyManagerError::duplicate_group(name));
        }

        match parent {
            Some(parent_name) => {
                self.require(parent_name)?;
                self.arena
                    .get_mut(parent_name)
                    .expect("checked above")
                    .subgroups
                    .push(name.to_string());
            }
            None => self.roots.push(name.to_string()),
        }

        self.arena.insert(
            name.to_string(),
            Group {
                name: name.to_string(),
                parent: parent.map(str::to_string),
                subgroups: Vec::new(),
                rule: None,
            },
        );
        Ok(())
    }

    /// Rename a group, propagating the new name to the arena, the parent's
    /// child list, every child's back-reference, and every bind
    pub fn rename(
        &mut self,
        name: &str,
        new_name: &str,
        binds: &mut BindIndex,
    ) -> MoneyManagerResult<()> {
        self.require(name)?;
        if self.arena.contains_key(new_name) {
            return Err(MoneyManagerError::duplicate_group(new_name));
        }

        let mut group = self.arena.remove(name).expect("checked above");
        group.name = new_name.to_string();

        match &group.parent {
            Some(parent_name) => {
                let parent = self.arena.get_mut(parent_name).expect("parent is live");
                rekey(&mut parent.subgroups, name, new_name);
            }
            None => rekey(&mut self.roots, name, new_name),
        }

        for child_name in &group.subgroups {
            let child = self.arena.get_mut(child_name).expect("child is live");
            child.parent = Some(new_name.to_string());
        }

        self.arena.insert(new_name.to_string(), group);
        binds.rename_group(name, new_name);
        Ok(())
    }

    /// Delete a group: drop every bind referencing it, recursively delete
    /// its subgroups, then detach it from its parent (or the roots)
    pub fn remove(&mut self, name: &str, binds: &mut BindIndex) -> MoneyManagerResult<()> {
        let group = self.require(name)?;
        let parent = group.parent.clone();

        self.remove_subtree(name, binds);

        match parent {
            Some(parent_name) => {
                if let Some(parent) = self.arena.get_mut(&parent_name) {
                    parent.subgroups.retain(|s| s != name);
                }
            }
            None => self.roots.retain(|s| s != name),
        }
        Ok(())
    }

    fn remove_subtree(&mut self, name: &str, binds: &mut BindIndex) {
        binds.remove_group(name);
        let subgroups = self
            .arena
            .get(name)
            .map(|g| g.subgroups.clone())
            .unwrap_or_default();
        for sub in subgroups {
            self.remove_subtree(&sub, binds);
        }
        self.arena.remove(name);
    }

    /// Attach or clear a group's rule set
    pub fn set_rule(&mut self, name: &str, rule: Option<RuleSet>) -> MoneyManagerResult<()> {
        self.require(name)?;
        self.arena.get_mut(name).expect("checked above").rule = rule;
        Ok(())
    }

    /// Pre-order traversal of the whole forest
    pub fn all(&self) -> Vec<&Group> {
        let mut out = Vec::with_capacity(self.arena.len());
        for root in &self.roots {
            self.walk(root, &mut out);
        }
        out
    }

    fn walk<'a>(&'a self, name: &str, out: &mut Vec<&'a Group>) {
        let group = &self.arena[name];
        out.push(group);
        for sub in &group.subgroups {
            self.walk(sub, out);
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

fn rekey(names: &mut [String], old: &str, new: &str) {
    if let Some(slot) = names.iter_mut().find(|n| *n == old) {
        *slot = new.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BindKind, GroupBind};
    use tempfile::TempDir;

    fn store_with_tree() -> GroupStore {
        // Food
        //   Groceries
        //   Restaurants
        // Housing
        let mut store = GroupStore::new(PathBuf::from("unused.yml"));
        store.create("Food", None).unwrap();
        store.create("Groceries", Some("Food")).unwrap();
        store.create("Restaurants", Some("Food")).unwrap();
        store.create("Housing", None).unwrap();
        store
    }

    #[test]
    fn test_create_rejects_duplicates_anywhere() {
        let mut store = store_with_tree();
        // same name as a nested group, different parent
        let err = store.create("Groceries", Some("Housing")).unwrap_err();
        assert!(matches!(err, MoneyManagerError::DuplicateGroupName { .. }));
        // same name at the root
        assert!(store.create("Food", None).is_err());
    }

    #[test]
    fn test_create_under_missing_parent_fails() {
        let mut store = store_with_tree();
        let err = store.create("Bills", Some("Nope")).unwrap_err();
        assert!(matches!(err, MoneyManagerError::GroupNotFound { .. }));
    }

    #[test]
    fn test_get_and_require() {
        let store = store_with_tree();
        assert!(store.get("Food").is_some());
        assert!(store.get("Nope").is_none());
        assert!(store.require("Food").is_ok());
        assert!(matches!(
            store.require("Nope").unwrap_err(),
            MoneyManagerError::GroupNotFound { .. }
        ));
    }

    #[test]
    fn test_all_is_preorder() {
        let store = store_with_tree();
        let names: Vec<&str> = store.all().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Food", "Groceries", "Restaurants", "Housing"]);
    }

    #[test]
    fn test_rename_propagates_everywhere() {
        let mut store = store_with_tree();
        let mut binds = BindIndex::default();
        binds.add(GroupBind::new("t1", "Food", BindKind::Manual));
        binds.add(GroupBind::new("t2", "Food", BindKind::Auto));

        store.rename("Food", "Meals", &mut binds).unwrap();

        assert!(store.get("Food").is_none());
        let meals = store.get("Meals").unwrap();
        assert_eq!(meals.subgroups, ["Groceries", "Restaurants"]);
        assert_eq!(store.roots()[0], "Meals");
        assert_eq!(
            store.get("Groceries").unwrap().parent.as_deref(),
            Some("Meals")
        );
        assert_eq!(binds.for_group("Meals").count(), 2);
        assert_eq!(binds.for_group("Food").count(), 0);
    }

    #[test]
    fn test_rename_to_taken_name_fails() {
        let mut store = store_with_tree();
        let mut binds = BindIndex::default();
        let err = store.rename("Food", "Housing", &mut binds).unwrap_err();
        assert!(matches!(err, MoneyManagerError::DuplicateGroupName { .. }));
        // nothing changed
        assert!(store.get("Food").is_some());
    }

    #[test]
    fn test_remove_cascades_subgroups_and_binds() {
        let mut store = store_with_tree();
        let mut binds = BindIndex::default();
        binds.add(GroupBind::new("t1", "Food", BindKind::Manual));
        binds.add(GroupBind::new("t1", "Groceries", BindKind::Auto));
        binds.add(GroupBind::new("t2", "Restaurants", BindKind::Auto));
        binds.add(GroupBind::new("t2", "Housing", BindKind::Manual));

        store.remove("Food", &mut binds).unwrap();

        assert!(store.get("Food").is_none());
        assert!(store.get("Groceries").is_none());
        assert!(store.get("Restaurants").is_none());
        assert!(store.get("Housing").is_some());
        assert_eq!(store.roots(), ["Housing"]);
        // only the Housing bind survives
        assert_eq!(binds.len(), 1);
        assert!(binds.get("t2", "Housing").is_some());
    }

    #[test]
    fn test_remove_middle_group_detaches_from_parent() {
        let mut store = store_with_tree();
        let mut binds = BindIndex::default();
        store.remove("Groceries", &mut binds).unwrap();
        assert_eq!(store.get("Food").unwrap().subgroups, ["Restaurants"]);
    }

    #[test]
    fn test_load_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("groups.yml");
        std::fs::write(
            &path,
            "
- group_name: Food
  subgroups:
    - group_name: Groceries
      rules:
        - type: contains
          key: label
          value: MARKET
- group_name: Housing
",
        )
        .unwrap();

        let mut store = GroupStore::new(path.clone());
        store.load().unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.get("Groceries").unwrap().rule.is_some());

        store.save().unwrap();
        let mut store2 = GroupStore::new(path);
        store2.load().unwrap();
        let names: Vec<&str> = store2.all().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Food", "Groceries", "Housing"]);
        assert!(store2.get("Groceries").unwrap().rule.is_some());
    }

    #[test]
    fn test_load_duplicate_name_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("groups.yml");
        std::fs::write(
            &path,
            "
- group_name: Food
  subgroups:
    - group_name: Food
",
        )
        .unwrap();

        let mut store = GroupStore::new(path);
        assert!(matches!(
            store.load().unwrap_err(),
            MoneyManagerError::DuplicateGroupName { .. }
        ));
    }

    #[test]
    fn test_load_bad_rule_reports_group() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("groups.yml");
        std::fs::write(
            &path,
            "
- group_name: Food
  rules:
    - type: fuzzy
      key: label
      value: MARKET
",
        )
        .unwrap();

        let mut store = GroupStore::new(path);
        match store.load().unwrap_err() {
            MoneyManagerError::UnknownRuleKind { kind, group } => {
                assert_eq!(kind, "fuzzy");
                assert_eq!(group, "Food");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
