//! Tree models
//!
//! Both models are arenas: nodes live in a `Vec` owned by the container and refer
//! to each other by id, so parent links never own anything.
//!
//! - [`Tree`]: one parent per node, the shape the block parser builds.
//! - [`AcyclicGraph`]: any number of parents per node, for dependency-style data
//!   where one node is reachable along several paths.
//!
//! In both, a node's depth is one more than its (deepest) parent's, and is kept
//! up to date for the whole subtree whenever links change.

pub mod acyclic;
pub mod node;

pub use acyclic::{AcyclicGraph, GraphNodeId};
pub use node::{Ancestors, Descendants, NodeId, Tree};
