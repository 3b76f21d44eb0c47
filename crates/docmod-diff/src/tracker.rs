//! Cycle and re-traversal guard.
//!
//! Two mechanisms keep a traversal finite:
//!
//! - every [`Branch`] carries the object numbers entered on its way down, so
//!   an object is never entered again below itself;
//! - the [`VisitedReferences`] table records each (key, object number) pair
//!   entered anywhere in the comparison, so a shared object reached again
//!   through the same key is not walked twice.
//!
//! The key is part of the guard: the same object reached under a different
//! key is still compared, so one cycle break cannot hide changes reachable
//! through an unrelated entry.

use std::collections::{HashMap, HashSet};

use docmod_types::ObjectNumber;

use crate::path::ObjectPath;

/// Position of the traversal: the path plus the references entered on it.
#[derive(Clone, Debug, Default)]
pub struct Branch {
    path: ObjectPath,
    references: Vec<ObjectNumber>,
}

impl Branch {
    pub fn new(path: ObjectPath) -> Self {
        Self {
            path,
            references: Vec::new(),
        }
    }

    /// Copy of this branch one key deeper.
    pub fn enter_key(&self, key: &str) -> Self {
        Self {
            path: self.path.enter_key(key),
            references: self.references.clone(),
        }
    }

    /// Copy of this branch one array element deeper.
    pub fn enter_index(&self, index: usize) -> Self {
        Self {
            path: self.path.enter_index(index),
            references: self.references.clone(),
        }
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Returns `true` if `number` was entered on the way to this branch.
    pub fn has_ancestor(&self, number: ObjectNumber) -> bool {
        self.references.contains(&number)
    }

    fn push_reference(&mut self, number: ObjectNumber) {
        self.references.push(number);
    }
}

/// (key, object number) pairs already entered during one comparison.
#[derive(Debug, Default)]
pub struct VisitedReferences {
    keys_by_number: HashMap<ObjectNumber, HashSet<String>>,
}

impl VisitedReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether entering `number` under `key` from `branch` would revisit it.
    ///
    /// Direct objects (no number) are never considered visited.
    pub fn is_already_visited(&self, branch: &Branch, key: &str, number: Option<ObjectNumber>) -> bool {
        let Some(number) = number else {
            return false;
        };
        let seen_under_key = self
            .keys_by_number
            .get(&number)
            .is_some_and(|keys| keys.contains(key));
        seen_under_key || branch.has_ancestor(number)
    }

    /// Record that `number` is being entered under `key` on `branch`.
    pub fn mark_visited(&mut self, branch: &mut Branch, key: &str, number: Option<ObjectNumber>) {
        if let Some(number) = number {
            self.keys_by_number
                .entry(number)
                .or_default()
                .insert(key.to_string());
            branch.push_reference(number);
        }
    }

    /// Number of distinct (key, object number) pairs recorded.
    pub fn len(&self) -> usize {
        self.keys_by_number.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys_by_number.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(number: u64) -> Option<ObjectNumber> {
        Some(ObjectNumber::new(number))
    }

    #[test]
    fn direct_objects_are_never_visited() {
        let mut visited = VisitedReferences::new();
        let mut branch = Branch::new(ObjectPath::root()).enter_key("A");
        visited.mark_visited(&mut branch, "A", None);
        assert!(!visited.is_already_visited(&branch, "A", None));
        assert!(visited.is_empty());
    }

    #[test]
    fn same_key_and_number_is_visited() {
        let mut visited = VisitedReferences::new();
        let root = Branch::new(ObjectPath::root());
        let mut child = root.enter_key("Font");
        visited.mark_visited(&mut child, "Font", n(7));

        // A sibling branch reaching the same object under the same key.
        let sibling = root.enter_key("Other");
        assert!(visited.is_already_visited(&sibling, "Font", n(7)));
    }

    #[test]
    fn different_key_is_tracked_independently() {
        let mut visited = VisitedReferences::new();
        let root = Branch::new(ObjectPath::root());
        let mut child = root.enter_key("Font");
        visited.mark_visited(&mut child, "Font", n(7));

        assert!(!visited.is_already_visited(&root, "XObject", n(7)));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn ancestors_block_reentry_under_any_key() {
        let mut visited = VisitedReferences::new();
        let root = Branch::new(ObjectPath::root());
        let mut child = root.enter_key("Pages");
        visited.mark_visited(&mut child, "Pages", n(2));

        let grandchild = child.enter_key("Kids");
        assert!(visited.is_already_visited(&grandchild, "Parent", n(2)));
        // The parent branch did not see the push.
        assert!(!root.has_ancestor(ObjectNumber::new(2)));
    }

    #[test]
    fn branches_are_values() {
        let root = Branch::new(ObjectPath::labelled("Catalog"));
        let a = root.enter_key("A");
        let b = root.enter_index(3);
        assert_eq!(root.depth(), 1);
        assert_eq!(a.path().to_string(), "Catalog/A");
        assert_eq!(b.path().to_string(), "Catalog[3]");
    }
}
