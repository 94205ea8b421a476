//! Snapshots - serializable views of scan results
//!
//! A snapshot borrows from the value it describes and only exists to be handed to
//! a serializer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::blockscan::extraction::{AttributeValues, NestedValues};
use crate::blockscan::tree::{NodeId, Tree};

/// Name used for the group of attributes seen before any definition line.
pub const UNNAMED_GROUP: &str = "<none>";

/// A node and its subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot<'a, K> {
    pub key: &'a K,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot<'a, K>>,
}

/// Snapshot of the whole tree, starting at the root.
pub fn snapshot<K>(tree: &Tree<K>) -> TreeSnapshot<'_, K> {
    snapshot_node(tree, tree.root())
}

pub fn snapshot_node<K>(tree: &Tree<K>, id: NodeId) -> TreeSnapshot<'_, K> {
    TreeSnapshot {
        key: tree.key(id),
        depth: tree.depth(id),
        children: tree
            .children(id)
            .iter()
            .map(|&child| snapshot_node(tree, child))
            .collect(),
    }
}

/// Nested extraction results with string keys, as json requires.
pub fn nested_snapshot(values: &NestedValues) -> BTreeMap<&str, &AttributeValues> {
    values
        .iter()
        .map(|(key, attributes)| (key.as_deref().unwrap_or(UNNAMED_GROUP), attributes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_mirrors_tree() {
        let mut tree = Tree::new(0);
        let one = tree.push_child(tree.root(), 1);
        tree.push_child(one, 2);
        tree.push_child(tree.root(), 3);

        let snap = snapshot(&tree);
        assert_eq!(*snap.key, 0);
        assert_eq!(snap.children.len(), 2);
        assert_eq!(*snap.children[0].children[0].key, 2);
        assert_eq!(snap.children[0].children[0].depth, 2);
        assert!(snap.children[1].children.is_empty());
    }

    #[test]
    fn test_nested_snapshot_names_the_unnamed_group() {
        let mut values = NestedValues::new();
        values.insert(None, AttributeValues::new());
        values.insert(Some("blur".to_string()), AttributeValues::new());

        let keys: Vec<_> = nested_snapshot(&values).into_keys().collect();
        assert_eq!(keys, vec![UNNAMED_GROUP, "blur"]);
    }
}
