//! Main module for blockscan library functionality

pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod tree;

pub use error::{ParseError, ParseResult, TreeError};
pub use extraction::{extract_many, extract_nested, extract_one, NestedMode};
pub use lexing::{tokenize, TokenStyle, Tokenizer};
pub use parsing::{parse_blocks, parse_blocks_strict, BlockHooks, Cursor, ScanSummary};
pub use tree::{AcyclicGraph, GraphNodeId, NodeId, Tree};
