//! Token styles
//!
//! A token style says how to recognize one labeled value on a line: the leading
//! token that identifies the line, where the value sits among the tokens, and
//! how the line is split. Styles are plain values; build them once and hand them
//! to the extraction readers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Tokenizer, DEFAULT_SEPARATORS, UNBOUNDED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStyle {
    token: String,
    #[serde(default = "default_value_index")]
    value_index: usize,
    #[serde(default = "default_separators")]
    separators: String,
    #[serde(default = "default_max_splits")]
    max_splits: i32,
}

fn default_value_index() -> usize {
    1
}

fn default_separators() -> String {
    DEFAULT_SEPARATORS.to_string()
}

fn default_max_splits() -> i32 {
    UNBOUNDED
}

impl TokenStyle {
    /// A style reading the token right after `token`, split on whitespace.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value_index: default_value_index(),
            separators: default_separators(),
            max_splits: default_max_splits(),
        }
    }

    pub fn with_value_index(mut self, value_index: usize) -> Self {
        self.value_index = value_index;
        self
    }

    /// An empty separator set falls back to whitespace.
    pub fn with_separators(mut self, separators: impl Into<String>) -> Self {
        let separators = separators.into();
        self.separators = if separators.is_empty() {
            default_separators()
        } else {
            separators
        };
        self
    }

    pub fn with_max_splits(mut self, max_splits: i32) -> Self {
        self.max_splits = max_splits;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn value_index(&self) -> usize {
        self.value_index
    }

    pub fn separators(&self) -> &str {
        &self.separators
    }

    pub fn max_splits(&self) -> i32 {
        self.max_splits
    }

    /// Case-insensitive comparison against a line's leading token.
    pub fn matches(&self, leading: &str) -> bool {
        leading.to_lowercase() == self.token.to_lowercase()
    }

    /// Lower-cased first character of the token, used to reject lines cheaply.
    pub fn first_char(&self) -> Option<char> {
        self.token.chars().next().and_then(|c| c.to_lowercase().next())
    }

    /// A tokenizer splitting the way this style expects.
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new()
            .separators(self.separators.as_str())
            .max_splits(self.max_splits)
    }
}

impl fmt::Display for TokenStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}:{},{:?},{}",
            self.token, self.value_index, self.separators, self.max_splits
        )
    }
}
