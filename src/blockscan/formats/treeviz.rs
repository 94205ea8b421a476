//! Treeviz - indented plain text views
//!
//! Trees print through their `Display` impl; the helpers here give extraction
//! results the same look:
//!
//!     size
//!       10
//!       20

use std::fmt::Write;

use super::snapshot::UNNAMED_GROUP;
use crate::blockscan::extraction::{NestedValues, TokenValues};

const INDENT: &str = "  ";

/// Tokens first, their values one level below.
pub fn token_values(values: &TokenValues) -> String {
    let mut out = String::new();
    for (token, found) in values {
        push_line(&mut out, 0, token);
        for value in found {
            push_line(&mut out, 1, value);
        }
    }
    out
}

/// Group names, then attributes, then values.
pub fn nested_values(values: &NestedValues) -> String {
    let mut out = String::new();
    for (group, attributes) in values {
        push_line(&mut out, 0, group.as_deref().unwrap_or(UNNAMED_GROUP));
        for (attribute, found) in attributes {
            push_line(&mut out, 1, attribute);
            for value in found {
                push_line(&mut out, 2, value);
            }
        }
    }
    out
}

/// One line per input line, tokens joined with ` | `.
pub fn token_lines(tokens: &[Vec<String>]) -> String {
    let mut out = String::new();
    for (index, line) in tokens.iter().enumerate() {
        let _ = writeln!(out, "{:>4}: {}", index + 1, line.join(" | "));
    }
    out
}

fn push_line(out: &mut String, level: usize, text: &str) {
    let _ = writeln!(out, "{}{}", INDENT.repeat(level), text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockscan::extraction::AttributeValues;

    #[test]
    fn test_token_values_view() {
        let mut values = TokenValues::new();
        values.insert("size".to_string(), vec!["10".to_string(), "20".to_string()]);
        values.insert("name".to_string(), vec!["x".to_string()]);

        insta::assert_snapshot!(token_values(&values).trim_end(), @r"
        name
          x
        size
          10
          20
        ");
    }

    #[test]
    fn test_nested_values_view() {
        let mut attributes = AttributeValues::new();
        attributes.insert("input".to_string(), vec!["x".to_string()]);
        let mut values = NestedValues::new();
        values.insert(None, AttributeValues::new());
        values.insert(Some("A".to_string()), attributes);

        insta::assert_snapshot!(nested_values(&values).trim_end(), @r"
        <none>
        A
          input
            x
        ");
    }

    #[test]
    fn test_token_lines_view() {
        let tokens = vec![
            vec!["a".to_string(), "b".to_string()],
            Vec::new(),
            vec!["c".to_string()],
        ];
        assert_eq!(token_lines(&tokens), "   1: a | b\n   2: \n   3: c\n");
    }
}
