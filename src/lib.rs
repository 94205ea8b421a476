//! # blockscan
//!
//! Line-oriented text scanning: a quote-aware tokenizer, token/value extraction
//! driven by token styles, and a callback-driven block parser that turns a flat
//! sequence of lines into a node tree.
//!
//! File Layout
//!
//! src/blockscan
//!   ├── lexing       Splitting one line into tokens, token styles
//!   ├── extraction   Flat and nested token/value readers built on lexing
//!   ├── parsing      The block scanning state machine and its hooks
//!   ├── tree         Arena trees (single parent) and acyclic graphs (many parents)
//!   ├── formats      Snapshot + treeviz/json/yaml rendering
//!   └── config       Layered TOML configuration used by the binary
//!
//! The library never touches the filesystem: every entry point consumes lines
//! that the caller already has in memory. The `blockscan` binary is the only
//! place where files get read.

pub mod blockscan;
