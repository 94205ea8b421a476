//! Hook interface for the block scanner

use crate::blockscan::tree::{NodeId, Tree};

/// Where the scanner is when a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    /// The line as given, not trimmed.
    pub line: &'a str,
    /// 1-based position of the line in the input.
    pub line_number: usize,
    /// The current node.
    pub node: NodeId,
    /// The block depth counter at the time of the call.
    pub depth: i32,
}

/// Classification predicates and callbacks driving [`parse_blocks`](super::parse_blocks).
///
/// Every method has a default that does nothing: predicates report "no block",
/// key predicates report "not a key block", `step_in`/`step_out` keep the
/// current node. Implement only what the input format needs.
pub trait BlockHooks {
    /// Key type of the nodes built.
    type Key;

    /// 1 if the line opens a block, 0 otherwise.
    fn enter_block(&mut self, _tree: &Tree<Self::Key>, _at: Cursor<'_>) -> i32 {
        0
    }

    /// -1 if the line closes a block, 0 otherwise.
    fn exit_block(&mut self, _tree: &Tree<Self::Key>, _at: Cursor<'_>) -> i32 {
        0
    }

    /// Whether the block just opened should become a node.
    fn enter_key_block(&mut self, _tree: &Tree<Self::Key>, _at: Cursor<'_>) -> bool {
        false
    }

    /// Whether the block just closed was a node.
    fn exit_key_block(&mut self, _tree: &Tree<Self::Key>, _at: Cursor<'_>) -> bool {
        false
    }

    /// Called when a key block opens; the returned node becomes current. This is
    /// where nodes get created and attached.
    fn step_in(&mut self, _tree: &mut Tree<Self::Key>, at: Cursor<'_>) -> NodeId {
        at.node
    }

    /// Called when a key block closes; the returned node becomes current.
    /// Returning `None` ends the scan, ignoring the remaining lines.
    fn step_out(&mut self, _tree: &mut Tree<Self::Key>, at: Cursor<'_>) -> Option<NodeId> {
        Some(at.node)
    }

    /// After any block opens.
    fn on_enter(&mut self, _tree: &mut Tree<Self::Key>, _at: Cursor<'_>) {}

    /// After any block closes.
    fn on_exit(&mut self, _tree: &mut Tree<Self::Key>, _at: Cursor<'_>) {}

    /// For non-blank lines that neither open nor close a block.
    fn on_other(&mut self, _tree: &mut Tree<Self::Key>, _at: Cursor<'_>) {}

    /// First thing for every line, blank or not.
    fn on_update(&mut self, _tree: &mut Tree<Self::Key>, _at: Cursor<'_>) {}
}

impl<H: BlockHooks + ?Sized> BlockHooks for &mut H {
    type Key = H::Key;

    fn enter_block(&mut self, tree: &Tree<Self::Key>, at: Cursor<'_>) -> i32 {
        (**self).enter_block(tree, at)
    }

    fn exit_block(&mut self, tree: &Tree<Self::Key>, at: Cursor<'_>) -> i32 {
        (**self).exit_block(tree, at)
    }

    fn enter_key_block(&mut self, tree: &Tree<Self::Key>, at: Cursor<'_>) -> bool {
        (**self).enter_key_block(tree, at)
    }

    fn exit_key_block(&mut self, tree: &Tree<Self::Key>, at: Cursor<'_>) -> bool {
        (**self).exit_key_block(tree, at)
    }

    fn step_in(&mut self, tree: &mut Tree<Self::Key>, at: Cursor<'_>) -> NodeId {
        (**self).step_in(tree, at)
    }

    fn step_out(&mut self, tree: &mut Tree<Self::Key>, at: Cursor<'_>) -> Option<NodeId> {
        (**self).step_out(tree, at)
    }

    fn on_enter(&mut self, tree: &mut Tree<Self::Key>, at: Cursor<'_>) {
        (**self).on_enter(tree, at)
    }

    fn on_exit(&mut self, tree: &mut Tree<Self::Key>, at: Cursor<'_>) {
        (**self).on_exit(tree, at)
    }

    fn on_other(&mut self, tree: &mut Tree<Self::Key>, at: Cursor<'_>) {
        (**self).on_other(tree, at)
    }

    fn on_update(&mut self, tree: &mut Tree<Self::Key>, at: Cursor<'_>) {
        (**self).on_update(tree, at)
    }
}
