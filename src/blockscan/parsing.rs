//! Block parsing
//!
//! A generic scanner that walks lines once and builds a [`Tree`](crate::blockscan::tree::Tree)
//! from caller-supplied classification hooks. It recognizes two things only:
//!
//! - structure: whether a line opens or closes a block (`enter_block`/`exit_block`
//!   change a signed depth counter);
//! - meaning: whether that block should become a tree node (`enter_key_block`/
//!   `exit_key_block`, with `step_in`/`step_out` producing the new current node).
//!
//! Keeping the two apart lets one engine read decorative blocks (comment fences)
//! and named blocks (shader stages, operations) with the same depth bookkeeping.
//!
//! Per line the engine runs:
//!
//!     on_update                    always, blank lines included
//!     skip blank line
//!     depth += enter_block
//!     entered?  on_enter, maybe step_in, next line
//!     depth += exit_block
//!     exited?   on_exit, maybe step_out (None stops the scan), next line
//!     on_other
//!
//! [`parse_blocks`] trusts the hooks: unbalanced predicates just yield an odd
//! tree. [`parse_blocks_strict`] reports them as
//! [`ParseError::MalformedNesting`](crate::blockscan::error::ParseError).
//!
//! [`strip_blocks`] is a smaller relative that drops blocks from a line list
//! instead of building a tree.

pub mod engine;
pub mod hooks;
pub mod patterns;
pub mod strip;

pub use engine::{parse_blocks, parse_blocks_strict, ScanSummary};
pub use hooks::{BlockHooks, Cursor};
pub use patterns::{PatternHooks, Section};
pub use strip::strip_blocks;
