//! Error types for tokenizing, extraction, block parsing and tree edits

use thiserror::Error;

/// Errors raised while turning lines into tokens, values or trees
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A line holds an odd number of unescaped double quotes
    #[error("Expected matching quotes in line: {line}")]
    QuoteMismatch { line: String },

    /// A matched line produced fewer tokens than the style's value index requires
    #[error("Token '{token}' expects a value at index {index} but line has {len} token(s): {line}")]
    IndexOutOfRange {
        line: String,
        token: String,
        index: usize,
        len: usize,
    },

    /// Only reported by the strict block scanner
    #[error("Malformed nesting at line {line_number} ({reason}): {line}")]
    MalformedNesting {
        line_number: usize,
        line: String,
        reason: String,
    },
}

impl ParseError {
    /// The raw line the error was raised for
    pub fn line(&self) -> &str {
        match self {
            ParseError::QuoteMismatch { line }
            | ParseError::IndexOutOfRange { line, .. }
            | ParseError::MalformedNesting { line, .. } => line,
        }
    }
}

/// Result alias used throughout the scanning code
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised when editing a [`Tree`](crate::blockscan::tree::Tree) or
/// [`AcyclicGraph`](crate::blockscan::tree::AcyclicGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not belong to this arena")]
    UnknownNode(usize),

    #[error("linking node {child} under node {parent} would create a cycle")]
    Cycle { parent: usize, child: usize },

    #[error("node {0} cannot be linked to itself")]
    SelfLink(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_mismatch_message_carries_line() {
        let err = ParseError::QuoteMismatch {
            line: "a \"b".to_string(),
        };
        assert_eq!(err.to_string(), "Expected matching quotes in line: a \"b");
        assert_eq!(err.line(), "a \"b");
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = ParseError::IndexOutOfRange {
            line: "size".to_string(),
            token: "size".to_string(),
            index: 1,
            len: 1,
        };
        assert!(err.to_string().contains("index 1"));
        assert_eq!(err.line(), "size");
    }
}
