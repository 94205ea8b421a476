//! Quote-aware line tokenizer
//!
//! The scan walks the line once, left to right, in one of three modes: skipping
//! a separator run, reading a quoted span, or reading a bare word. Post-processing
//! (case folding, quote stripping) runs on the finished tokens and never splits
//! them again.

use super::{DEFAULT_SEPARATORS, UNBOUNDED};
use crate::blockscan::error::{ParseError, ParseResult};

const QUOTE: char = '"';
const ESCAPE: char = '\\';

/// Options for splitting a line into tokens.
///
/// Defaults: whitespace separators, unbounded splits, quoted spans kept whole,
/// tokens lower-cased, quotes left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    separators: String,
    max_splits: i32,
    split_inside_quotes: bool,
    preserve_case: bool,
    strip_quotes: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.to_string(),
            max_splits: UNBOUNDED,
            split_inside_quotes: false,
            preserve_case: false,
            strip_quotes: false,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every character of `separators` delimits tokens. An empty set falls back
    /// to the default whitespace separators.
    pub fn separators(mut self, separators: impl Into<String>) -> Self {
        let separators = separators.into();
        self.separators = if separators.is_empty() {
            DEFAULT_SEPARATORS.to_string()
        } else {
            separators
        };
        self
    }

    /// Any negative value means unbounded. Once the limit is reached, the rest of
    /// the line, leading separators included, becomes one last token unless it
    /// holds nothing but separators.
    pub fn max_splits(mut self, max_splits: i32) -> Self {
        self.max_splits = max_splits;
        self
    }

    /// When set, quotes are plain characters and the line is split on separators only.
    pub fn split_inside_quotes(mut self, yes: bool) -> Self {
        self.split_inside_quotes = yes;
        self
    }

    pub fn preserve_case(mut self, yes: bool) -> Self {
        self.preserve_case = yes;
        self
    }

    /// Trim surrounding whitespace and one pair of surrounding quotes from each token.
    pub fn strip_quotes(mut self, yes: bool) -> Self {
        self.strip_quotes = yes;
        self
    }

    pub fn get_separators(&self) -> &str {
        &self.separators
    }

    pub fn get_max_splits(&self) -> i32 {
        self.max_splits
    }

    /// Split `line` into tokens.
    pub fn tokenize(&self, line: &str) -> ParseResult<Vec<String>> {
        let raw = self.split(line)?;
        Ok(raw.into_iter().map(|token| self.clean(token)).collect())
    }

    fn split(&self, line: &str) -> ParseResult<Vec<String>> {
        let quotes_are_special = !self.split_inside_quotes;
        if quotes_are_special && count_unescaped_quotes(line) % 2 == 1 {
            return Err(ParseError::QuoteMismatch {
                line: line.to_string(),
            });
        }

        let chars: Vec<(usize, char)> = line.char_indices().collect();
        let limit = usize::try_from(self.max_splits).ok();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if limit.is_some_and(|n| tokens.len() >= n) {
                break;
            }
            let c = chars[i].1;
            if self.is_separator(c) {
                i += 1;
            } else if quotes_are_special && c == QUOTE {
                let (token, next) = self.read_quoted(line, &chars, i)?;
                tokens.push(token);
                i = next;
            } else {
                let (token, next) = self.read_word(&chars, i, quotes_are_special);
                tokens.push(token);
                i = next;
            }
        }

        // A remainder made of separators only is a separator run, not a token.
        if chars[i..].iter().any(|&(_, c)| !self.is_separator(c)) {
            tokens.push(line[chars[i].0..].to_string());
        }

        Ok(tokens)
    }

    /// Reads from an opening quote up to and including its closing quote.
    fn read_quoted(
        &self,
        line: &str,
        chars: &[(usize, char)],
        start: usize,
    ) -> ParseResult<(String, usize)> {
        let mut token = String::from(QUOTE);
        let mut i = start + 1;
        while i < chars.len() {
            let c = chars[i].1;
            if is_escaped_quote(chars, i) {
                token.push(ESCAPE);
                token.push(QUOTE);
                i += 2;
                continue;
            }
            token.push(c);
            i += 1;
            if c == QUOTE {
                return Ok((token, i));
            }
        }
        Err(ParseError::QuoteMismatch {
            line: line.to_string(),
        })
    }

    /// Reads until a separator or an opening quote.
    fn read_word(
        &self,
        chars: &[(usize, char)],
        start: usize,
        stop_at_quote: bool,
    ) -> (String, usize) {
        let mut token = String::new();
        let mut i = start;
        while i < chars.len() {
            let c = chars[i].1;
            if stop_at_quote && is_escaped_quote(chars, i) {
                token.push(ESCAPE);
                token.push(QUOTE);
                i += 2;
                continue;
            }
            if self.is_separator(c) || (stop_at_quote && c == QUOTE) {
                break;
            }
            token.push(c);
            i += 1;
        }
        (token, i)
    }

    fn is_separator(&self, c: char) -> bool {
        self.separators.contains(c)
    }

    fn clean(&self, token: String) -> String {
        let token = if self.strip_quotes {
            strip_surrounding_quotes(&token).to_string()
        } else {
            token
        };
        if self.preserve_case {
            token
        } else {
            token.to_lowercase()
        }
    }
}

/// Split a line into tokens in one call.
///
/// `max_splits` below zero means unbounded. See [`Tokenizer`] for the meaning
/// of the flags.
pub fn tokenize(
    line: &str,
    separators: &str,
    max_splits: i32,
    split_inside_quotes: bool,
    preserve_case: bool,
    strip_quotes: bool,
) -> ParseResult<Vec<String>> {
    Tokenizer::new()
        .separators(separators)
        .max_splits(max_splits)
        .split_inside_quotes(split_inside_quotes)
        .preserve_case(preserve_case)
        .strip_quotes(strip_quotes)
        .tokenize(line)
}

fn is_escaped_quote(chars: &[(usize, char)], i: usize) -> bool {
    chars[i].1 == ESCAPE && chars.get(i + 1).is_some_and(|&(_, next)| next == QUOTE)
}

fn count_unescaped_quotes(line: &str) -> usize {
    let mut count = 0;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE if chars.peek() == Some(&QUOTE) => {
                chars.next();
            }
            QUOTE => count += 1,
            _ => {}
        }
    }
    count
}

/// Trims whitespace, then one pair of surrounding quotes, then whitespace again.
pub(crate) fn strip_surrounding_quotes(token: &str) -> &str {
    let trimmed = token.trim();
    let trimmed = trimmed.strip_prefix(QUOTE).unwrap_or(trimmed);
    let trimmed = match trimmed.strip_suffix(QUOTE) {
        Some(inner) if !inner.ends_with(ESCAPE) => inner,
        _ => trimmed,
    };
    trimmed.trim()
}
