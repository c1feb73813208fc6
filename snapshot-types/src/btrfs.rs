// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Quota group identifier as printed by `btrfs qgroup show` (e.g. `0/257`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaGroupId(String);

impl QuotaGroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotaGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subvolumes discovered beneath a root, in the order the walk visited them
///
/// Every entry is relative to `root` and denotes a true subvolume. The root
/// itself is never part of `nested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubvolumeTree {
    root: PathBuf,
    nested: Vec<PathBuf>,
}

impl SubvolumeTree {
    pub fn new(root: impl Into<PathBuf>, nested: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            nested,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths in walk order
    pub fn nested(&self) -> &[PathBuf] {
        &self.nested
    }

    pub fn is_empty(&self) -> bool {
        self.nested.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nested.len()
    }

    /// Nested paths sorted in descending byte-lexicographic order.
    ///
    /// A descendant's relative path always extends its ancestor's path plus a
    /// separator, so it sorts after the ancestor and therefore comes first here.
    pub fn bottom_up(&self) -> Vec<PathBuf> {
        let mut ordered = self.nested.clone();
        ordered.sort_by(|left, right| right.as_os_str().cmp(left.as_os_str()));
        ordered
    }

    /// Absolute paths in teardown order: every nested subvolume bottom-up, then the root.
    pub fn deletion_order(&self) -> Vec<PathBuf> {
        let mut ordered: Vec<PathBuf> = self
            .bottom_up()
            .into_iter()
            .map(|relative| self.root.join(relative))
            .collect();
        ordered.push(self.root.clone());
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(root: &str, nested: &[&str]) -> SubvolumeTree {
        SubvolumeTree::new(root, nested.iter().map(PathBuf::from).collect())
    }

    fn assert_descendants_first(order: &[PathBuf]) {
        for (index, path) in order.iter().enumerate() {
            for later in &order[index + 1..] {
                assert!(
                    !later.starts_with(path),
                    "{} is deleted before its descendant {}",
                    path.display(),
                    later.display()
                );
            }
        }
    }

    #[test]
    fn nested_scenario_deletes_children_before_parents() {
        let order = tree("/R", &["a", "a/b", "c"]).deletion_order();

        assert_eq!(
            order,
            vec![
                PathBuf::from("/R/c"),
                PathBuf::from("/R/a/b"),
                PathBuf::from("/R/a"),
                PathBuf::from("/R"),
            ]
        );
    }

    #[test]
    fn walk_order_does_not_affect_deletion_order() {
        let shuffled = tree("/R", &["c", "a/b", "a"]).deletion_order();
        let preorder = tree("/R", &["a", "a/b", "c"]).deletion_order();
        assert_eq!(shuffled, preorder);
    }

    #[test]
    fn adversarial_sibling_names_keep_descendants_first() {
        // '-' and '.' sort below '/', '0' and 'b' above it
        let order = tree(
            "/pool/snap",
            &[
                "a", "a-b", "a.b", "a0", "ab", "a/b", "a/b/c", "a/b-c", "a/b/c/d", "a-b/x",
                "a.b/y/z", "a0/a/b",
            ],
        )
        .deletion_order();

        assert_descendants_first(&order);
        assert_eq!(order.last(), Some(&PathBuf::from("/pool/snap")));
        assert_eq!(order.len(), 13);
    }

    #[test]
    fn accessors_expose_walk_order() {
        let walked = tree("/R", &["c", "a"]);
        assert_eq!(walked.root(), Path::new("/R"));
        assert_eq!(walked.nested(), &[PathBuf::from("c"), PathBuf::from("a")]);
        assert_eq!(walked.len(), 2);
    }

    #[test]
    fn empty_tree_only_deletes_root() {
        let empty = tree("/R", &[]);
        assert!(empty.is_empty());
        assert_eq!(empty.deletion_order(), vec![PathBuf::from("/R")]);
    }

    #[test]
    fn quota_group_serializes_as_plain_string() {
        let group = QuotaGroupId::new("0/257");
        assert_eq!(group.to_string(), "0/257");
        assert_eq!(serde_json::to_string(&group).unwrap(), "\"0/257\"");
    }
}
