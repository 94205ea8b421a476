//! Extraction
//!
//! Readers that pull labeled values out of a sequence of lines. All of them work
//! on lines the caller already holds and go through [`lexing`](crate::blockscan::lexing)
//! for splitting.
//!
//! - [`extract_one`]: every value for a single token style.
//! - [`extract_many`]: values for several styles at once, first matching style wins.
//! - [`extract_nested`]: attribute values grouped under definition lines.
//! - [`collect_token_set`]: the distinct tokens satisfying a predicate.
//!
//! Lines that match nothing are skipped silently; empty input gives empty results.

pub mod flat;
pub mod nested;

pub use flat::{collect_token_set, extract_many, extract_one, TokenValues};
pub use nested::{extract_nested, AttributeValues, NestedMode, NestedValues};

/// Everything after this marker on a line is ignored by [`extract_many`].
pub const COMMENT_MARKER: char = '#';
