//! Multi-parent (acyclic graph) nodes

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::blockscan::error::TreeError;

/// Handle to a node of an [`AcyclicGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GraphNodeId(usize);

impl GraphNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GraphNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct GraphNode<K> {
    key: K,
    parents: Vec<GraphNodeId>,
    children: Vec<GraphNodeId>,
    depth: usize,
}

/// Nodes with any number of parents and children, kept free of cycles.
///
/// A node's depth is one more than the largest depth among its parents; nodes
/// without parents sit at depth 0. Accessors panic on ids minted elsewhere.
#[derive(Debug, Clone)]
pub struct AcyclicGraph<K> {
    nodes: Vec<GraphNode<K>>,
}

impl<K> Default for AcyclicGraph<K> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<K> AcyclicGraph<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: GraphNodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn add_node(&mut self, key: K) -> GraphNodeId {
        self.nodes.push(GraphNode {
            key,
            parents: Vec::new(),
            children: Vec::new(),
            depth: 0,
        });
        GraphNodeId(self.nodes.len() - 1)
    }

    /// First node whose key equals `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<GraphNodeId>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.nodes
            .iter()
            .position(|node| node.key.borrow() == key)
            .map(GraphNodeId)
    }

    /// Link `child` below `parent`. Linking an existing edge again is a no-op.
    pub fn add_child(
        &mut self,
        parent: GraphNodeId,
        child: GraphNodeId,
    ) -> Result<(), TreeError> {
        self.link(parent, child)
    }

    /// Link `parent` above `child`. Same edge as [`add_child`](Self::add_child).
    pub fn add_parent(
        &mut self,
        child: GraphNodeId,
        parent: GraphNodeId,
    ) -> Result<(), TreeError> {
        self.link(parent, child)
    }

    pub fn key(&self, id: GraphNodeId) -> &K {
        &self.nodes[id.0].key
    }

    pub fn key_mut(&mut self, id: GraphNodeId) -> &mut K {
        &mut self.nodes[id.0].key
    }

    pub fn parents(&self, id: GraphNodeId) -> &[GraphNodeId] {
        &self.nodes[id.0].parents
    }

    pub fn children(&self, id: GraphNodeId) -> &[GraphNodeId] {
        &self.nodes[id.0].children
    }

    pub fn depth(&self, id: GraphNodeId) -> usize {
        self.nodes[id.0].depth
    }

    /// Every node reachable through parent edges, each reported once, nearest first
    /// along each path.
    pub fn ancestors(&self, id: GraphNodeId) -> Vec<GraphNodeId> {
        self.walk(id, |node| &node.parents)
    }

    /// Every node reachable through child edges, each reported once, in pre-order.
    pub fn descendants(&self, id: GraphNodeId) -> Vec<GraphNodeId> {
        self.walk(id, |node| &node.children)
    }

    fn walk<F>(&self, from: GraphNodeId, edges: F) -> Vec<GraphNodeId>
    where
        F: Fn(&GraphNode<K>) -> &Vec<GraphNodeId>,
    {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<GraphNodeId> =
            edges(&self.nodes[from.0]).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(edges(&self.nodes[id.0]).iter().rev().copied());
        }
        order
    }

    fn link(&mut self, parent: GraphNodeId, child: GraphNodeId) -> Result<(), TreeError> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(TreeError::UnknownNode(id.0));
            }
        }
        if parent == child {
            return Err(TreeError::SelfLink(child.0));
        }
        if self.descendants(child).contains(&parent) {
            return Err(TreeError::Cycle {
                parent: parent.0,
                child: child.0,
            });
        }
        if self.nodes[parent.0].children.contains(&child) {
            return Ok(());
        }

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parents.push(parent);
        self.refresh_depths(child);
        Ok(())
    }

    fn refresh_depths(&mut self, from: GraphNodeId) {
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            let depth = self.nodes[id.0]
                .parents
                .iter()
                .map(|parent| self.nodes[parent.0].depth + 1)
                .max()
                .unwrap_or(0);
            if depth != self.nodes[id.0].depth || id == from {
                self.nodes[id.0].depth = depth;
                pending.extend(self.nodes[id.0].children.iter().copied());
            }
        }
    }
}

impl<K: Clone + PartialEq> AcyclicGraph<K> {
    /// Fold `other` into this graph, matching nodes by key.
    ///
    /// Keys missing here are added, and every edge of `other` is linked (edges
    /// already present stay single). Returns, per node of `other`, the id it has
    /// here. Stops at the first edge that would close a cycle; edges linked
    /// before it are kept.
    pub fn merge(&mut self, other: &AcyclicGraph<K>) -> Result<Vec<GraphNodeId>, TreeError> {
        let ids: Vec<GraphNodeId> = other
            .nodes
            .iter()
            .map(|node| match self.find(&node.key) {
                Some(id) => id,
                None => self.add_node(node.key.clone()),
            })
            .collect();

        for (index, node) in other.nodes.iter().enumerate() {
            for child in &node.children {
                self.link(ids[index], ids[child.0])?;
            }
        }
        Ok(ids)
    }
}
