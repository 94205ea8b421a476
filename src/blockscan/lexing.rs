//! Lexing
//!
//! Splits a single line into string tokens. This is the only place that knows
//! about separators and quoting; the extraction readers and the callers of the
//! block parser go through it whenever they need tokens.
//!
//! Quoting
//!
//!     A double quote opens a span that runs to the next unescaped double quote.
//!     Separators inside the span are ordinary characters, so the whole span is
//!     one token. `\"` never opens or closes a span. An odd number of unescaped
//!     quotes is a [`ParseError::QuoteMismatch`](crate::blockscan::error::ParseError).
//!
//! Split limits
//!
//!     With a split limit of `n`, once `n` tokens have been produced whatever
//!     is left of the line, separators and all, becomes one trailing token.

pub mod token_style;
pub mod tokenizer;

pub use token_style::TokenStyle;
pub use tokenizer::{tokenize, Tokenizer};

/// Space, tab and newline
pub const DEFAULT_SEPARATORS: &str = " \t\n";

/// Split limit meaning "split as often as possible"
pub const UNBOUNDED: i32 = -1;
