//! Single-parent tree

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::blockscan::error::TreeError;

/// Handle to a node of a [`Tree`]. Only meaningful for the tree that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeData<K> {
    key: K,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

impl<K> NodeData<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }
}

/// A rooted tree where every node has at most one parent.
///
/// Accessors taking a [`NodeId`] panic when given an id from another tree;
/// linking operations report that case as [`TreeError::UnknownNode`].
#[derive(Debug, Clone)]
pub struct Tree<K> {
    nodes: Vec<NodeData<K>>,
}

impl<K> Tree<K> {
    pub fn new(root_key: K) -> Self {
        Self {
            nodes: vec![NodeData::new(root_key)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Create a node that is not attached anywhere yet.
    pub fn new_node(&mut self, key: K) -> NodeId {
        self.nodes.push(NodeData::new(key));
        NodeId(self.nodes.len() - 1)
    }

    /// Create a node and append it under `parent`.
    pub fn push_child(&mut self, parent: NodeId, key: K) -> NodeId {
        let depth = self.nodes[parent.0].depth + 1;
        let child = self.new_node(key);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].depth = depth;
        self.nodes[parent.0].children.push(child);
        child
    }

    /// Append `child` under `parent`, moving it away from its previous parent.
    ///
    /// Depths of the whole moved subtree are recomputed. Linking a node below one
    /// of its own descendants is refused.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(TreeError::SelfLink(child.0));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(TreeError::Cycle {
                parent: parent.0,
                child: child.0,
            });
        }

        if let Some(previous) = self.nodes[child.0].parent.take() {
            self.nodes[previous.0].children.retain(|&id| id != child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.refresh_depths(child);
        Ok(())
    }

    pub fn key(&self, id: NodeId) -> &K {
        &self.nodes[id.0].key
    }

    pub fn key_mut(&mut self, id: NodeId) -> &mut K {
        &mut self.nodes[id.0].key
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    /// First direct child of `parent` whose key equals `key`.
    pub fn find_child<Q>(&self, parent: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.key(child).borrow() == key)
    }

    /// Parent, grandparent, ... up to the root, computed lazily.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, K> {
        Ancestors {
            tree: self,
            next: self.nodes[id.0].parent,
        }
    }

    /// Every node below `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, K> {
        Descendants {
            tree: self,
            stack: self.nodes[id.0].children.iter().rev().copied().collect(),
        }
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id.0))
        }
    }

    fn refresh_depths(&mut self, from: NodeId) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let depth = match self.nodes[id.0].parent {
                Some(parent) => self.nodes[parent.0].depth + 1,
                None => 0,
            };
            self.nodes[id.0].depth = depth;
            stack.extend(self.nodes[id.0].children.iter().copied());
        }
    }
}

/// Iterator over the ancestors of a node, nearest first
pub struct Ancestors<'a, K> {
    tree: &'a Tree<K>,
    next: Option<NodeId>,
}

impl<K> Iterator for Ancestors<'_, K> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.nodes[current.0].parent;
        Some(current)
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'a, K> {
    tree: &'a Tree<K>,
    stack: Vec<NodeId>,
}

impl<K> Iterator for Descendants<'_, K> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[current.0].children.iter().rev().copied());
        Some(current)
    }
}

/// One line per node under the root, indented two spaces per level.
impl<K: fmt::Display> fmt::Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root();
        let base = self.depth(root);
        write!(f, "{}", self.key(root))?;
        for id in self.descendants(root) {
            write!(f, "\n{}{}", "  ".repeat(self.depth(id) - base), self.key(id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_child_sets_parent_and_depth() {
        let mut tree = Tree::new("root");
        let a = tree.push_child(tree.root(), "a");
        let b = tree.push_child(a, "b");

        assert_eq!(tree.depth(tree.root()), 0);
        assert_eq!(tree.depth(a), 1);
        assert_eq!(tree.depth(b), 2);
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.children(tree.root()), &[a]);
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let mut tree = Tree::new("root");
        let a = tree.push_child(tree.root(), "a");
        let b = tree.push_child(a, "b");
        let keys: Vec<_> = tree.ancestors(b).map(|id| *tree.key(id)).collect();
        assert_eq!(keys, vec!["a", "root"]);
        assert_eq!(tree.ancestors(tree.root()).count(), 0);
    }

    #[test]
    fn test_descendants_are_pre_order() {
        let mut tree = Tree::new("root");
        let a = tree.push_child(tree.root(), "a");
        tree.push_child(a, "a1");
        tree.push_child(a, "a2");
        tree.push_child(tree.root(), "b");

        let keys: Vec<_> = tree.descendants(tree.root()).map(|id| *tree.key(id)).collect();
        assert_eq!(keys, vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_add_child_moves_subtree_and_refreshes_depths() {
        let mut tree = Tree::new("root");
        let a = tree.push_child(tree.root(), "a");
        let b = tree.push_child(a, "b");
        let c = tree.push_child(b, "c");
        let moved = tree.new_node("moved");
        let leaf = tree.push_child(moved, "leaf");
        assert_eq!(tree.depth(leaf), 1);

        tree.add_child(c, moved).unwrap();
        assert_eq!(tree.depth(moved), 4);
        assert_eq!(tree.depth(leaf), 5);

        tree.add_child(tree.root(), b).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.depth(b), 1);
        assert_eq!(tree.depth(leaf), 4);
    }

    #[test]
    fn test_add_child_refuses_cycles() {
        let mut tree = Tree::new("root");
        let a = tree.push_child(tree.root(), "a");
        let b = tree.push_child(a, "b");

        assert_eq!(
            tree.add_child(b, a),
            Err(TreeError::Cycle {
                parent: b.index(),
                child: a.index()
            })
        );
        assert_eq!(tree.add_child(a, a), Err(TreeError::SelfLink(a.index())));
        assert_eq!(tree.add_child(a, NodeId(42)), Err(TreeError::UnknownNode(42)));
    }

    #[test]
    fn test_find_child() {
        let mut tree = Tree::new("root".to_string());
        let a = tree.push_child(tree.root(), "a".to_string());
        tree.push_child(a, "deep".to_string());
        assert_eq!(tree.find_child(tree.root(), "a"), Some(a));
        assert_eq!(tree.find_child(tree.root(), "deep"), None);
    }

    #[test]
    fn test_display_indents_by_depth() {
        let mut tree = Tree::new("root");
        let a = tree.push_child(tree.root(), "a");
        tree.push_child(a, "b");
        tree.push_child(tree.root(), "c");
        insta::assert_snapshot!(tree.to_string(), @r"
        root
          a
            b
          c
        ");
    }
}
