//! Flat token/value readers

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::COMMENT_MARKER;
use crate::blockscan::error::{ParseError, ParseResult};
use crate::blockscan::lexing::{TokenStyle, DEFAULT_SEPARATORS};

/// Values found per style token, keyed by the token exactly as the style spells it.
pub type TokenValues = BTreeMap<String, Vec<String>>;

/// Collect the value of every line led by `style`'s token.
///
/// Blank lines and lines led by anything else are skipped. The value is trimmed of
/// whitespace and, with `strip_quotes`, of surrounding quotes.
pub fn extract_one<I, S>(
    lines: I,
    style: &TokenStyle,
    preserve_case: bool,
    strip_quotes: bool,
) -> ParseResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokenizer = style
        .tokenizer()
        .preserve_case(preserve_case)
        .strip_quotes(strip_quotes);
    let mut values = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let tokens = tokenizer.tokenize(line)?;
        let Some(leading) = tokens.first() else {
            continue;
        };
        if !style.matches(leading) {
            continue;
        }
        let value = value_at(&tokens, line, style)?;
        values.push(trim_value(value, strip_quotes).to_string());
    }

    Ok(values)
}

/// Collect values for several styles in one pass.
///
/// Every style gets an entry, even when nothing matched. Text after `#` is
/// dropped before matching. Styles are tried in the order given and the first
/// one whose token leads the line takes it; later styles never see that line.
/// Values are unquoted, and lower-cased unless `preserve_case` is set.
pub fn extract_many<I, S>(
    lines: I,
    styles: &[TokenStyle],
    preserve_case: bool,
) -> ParseResult<TokenValues>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values: TokenValues = styles
        .iter()
        .map(|style| (style.token().to_string(), Vec::new()))
        .collect();
    let first_chars: Vec<char> = styles.iter().filter_map(TokenStyle::first_char).collect();
    let tokenizers: Vec<_> = styles
        .iter()
        .map(|style| {
            style
                .tokenizer()
                .preserve_case(preserve_case)
                .strip_quotes(true)
        })
        .collect();
    let mut matched = 0usize;

    for line in lines {
        let content = strip_comment(line.as_ref().trim());
        let Some(first) = content.chars().next().and_then(|c| c.to_lowercase().next()) else {
            continue;
        };
        if !first_chars.contains(&first) {
            continue;
        }

        for (style, tokenizer) in styles.iter().zip(&tokenizers) {
            let tokens = tokenizer.tokenize(content)?;
            let Some(leading) = tokens.first() else {
                continue;
            };
            if style.matches(leading) {
                let value = value_at(&tokens, content, style)?.to_string();
                if let Some(slot) = values.get_mut(style.token()) {
                    slot.push(value);
                }
                matched += 1;
                break;
            }
        }
    }

    debug!(styles = styles.len(), matched, "extracted token values");
    Ok(values)
}

/// The distinct tokens for which `is_token` holds.
pub fn collect_token_set<I, S, F>(tokens: I, mut is_token: F) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    tokens
        .into_iter()
        .filter(|token| is_token(token.as_ref()))
        .map(|token| token.as_ref().to_string())
        .collect()
}

fn value_at<'a>(tokens: &'a [String], line: &str, style: &TokenStyle) -> ParseResult<&'a str> {
    tokens
        .get(style.value_index())
        .map(String::as_str)
        .ok_or_else(|| ParseError::IndexOutOfRange {
            line: line.to_string(),
            token: style.token().to_string(),
            index: style.value_index(),
            len: tokens.len(),
        })
}

fn trim_value(value: &str, strip_quotes: bool) -> &str {
    value.trim_matches(|c: char| DEFAULT_SEPARATORS.contains(c) || (strip_quotes && c == '"'))
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(at) => &line[..at],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_one_collects_matching_lines() {
        let lines = ["size 10", "other 1", "size 20"];
        let values = extract_one(lines, &TokenStyle::new("size"), false, false).unwrap();
        assert_eq!(values, vec!["10", "20"]);
    }

    #[test]
    fn test_extract_one_matches_token_case_insensitively() {
        let lines = ["Texture \"Maps/Rock.png\"", "", "   ", "TEXTURE other.png"];
        let values = extract_one(lines, &TokenStyle::new("texture"), true, true).unwrap();
        assert_eq!(values, vec!["Maps/Rock.png", "other.png"]);
    }

    #[test]
    fn test_extract_one_keeps_quotes_without_strip() {
        let values =
            extract_one(["name \"a b\""], &TokenStyle::new("name"), false, false).unwrap();
        assert_eq!(values, vec!["\"a b\""]);
    }

    #[test]
    fn test_extract_one_value_index_and_separators() {
        let style = TokenStyle::new("set")
            .with_separators("=, ")
            .with_value_index(2);
        let values = extract_one(["set color=red", "set size = 4"], &style, false, false).unwrap();
        assert_eq!(values, vec!["red", "4"]);
    }

    #[test]
    fn test_extract_one_index_out_of_range() {
        let err = extract_one(["size 1", "size"], &TokenStyle::new("size"), false, false)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange {
                line: "size".to_string(),
                token: "size".to_string(),
                index: 1,
                len: 1,
            }
        );
    }

    #[test]
    fn test_extract_one_propagates_quote_mismatch() {
        let err = extract_one(["size \"10"], &TokenStyle::new("size"), false, false).unwrap_err();
        assert!(matches!(err, ParseError::QuoteMismatch { .. }));
    }

    #[test]
    fn test_extract_many_index_out_of_range() {
        let styles = [TokenStyle::new("size").with_value_index(2)];
        let err = extract_many(["size 1 2", "Size 3 # no height"], &styles, false).unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange {
                line: "Size 3 ".to_string(),
                token: "size".to_string(),
                index: 2,
                len: 2,
            }
        );
    }

    #[test]
    fn test_extract_many_first_style_wins() {
        let styles = [
            TokenStyle::new("map").with_value_index(1),
            TokenStyle::new("map").with_value_index(2),
            TokenStyle::new("color"),
        ];
        let lines = ["map diffuse rock.png", "color red", "# map ignored x"];
        let values = extract_many(lines, &styles, false).unwrap();
        assert_eq!(values["map"], vec!["diffuse"]);
        assert_eq!(values["color"], vec!["red"]);
    }

    #[test]
    fn test_extract_many_strips_comments_and_quotes() {
        let styles = [TokenStyle::new("Shader"), TokenStyle::new("blend")];
        let lines = [
            "  shader \"Env/Sky\"   # the sky",
            "blend add",
            "#blend none",
            "",
            "unrelated line",
        ];
        let values = extract_many(lines, &styles, false).unwrap();
        assert_eq!(values["Shader"], vec!["env/sky"]);
        assert_eq!(values["blend"], vec!["add"]);
    }

    #[test]
    fn test_extract_many_preserve_case() {
        let values = extract_many(["Name Rock"], &[TokenStyle::new("name")], true).unwrap();
        assert_eq!(values["name"], vec!["Rock"]);
    }

    #[test]
    fn test_extract_many_empty_input_gives_empty_entries() {
        let lines: [&str; 0] = [];
        let values = extract_many(lines, &[TokenStyle::new("a"), TokenStyle::new("b")], false)
            .unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.values().all(Vec::is_empty));
    }

    #[test]
    fn test_collect_token_set() {
        let set = collect_token_set(["$a", "b", "$a", "$c"], |t| t.starts_with('$'));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["$a", "$c"]);
    }
}
