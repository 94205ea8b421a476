//! Nested extraction
//!
//! Groups attribute values under definition lines:
//!
//!     operation blur        <- definition line
//!     input src             <- attribute lines, buffered
//!     radius 4
//!     operation sharpen     <- flushes the buffer into the result
//!
//! Two policies decide which key a group lands under, see [`NestedMode`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::blockscan::error::{ParseError, ParseResult};
use crate::blockscan::lexing::Tokenizer;

/// Attribute token (lower-cased) to the values seen for it, in line order.
pub type AttributeValues = BTreeMap<String, Vec<String>>;

/// Group key to its attributes. `None` holds attributes seen before any definition
/// line in [`NestedMode::ByDefinitionValue`].
pub type NestedValues = BTreeMap<Option<String>, AttributeValues>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestedMode {
    /// The value after the definition token names the group. Groups sharing a
    /// name are merged.
    #[default]
    ByDefinitionValue,
    /// Definition lines only separate groups; the first value of the first
    /// attribute token names the group. Groups without that value are dropped.
    ByFirstAttributeValue,
}

/// Buffered attribute values between two definition lines
struct GroupBuffer {
    attributes: Vec<String>,
    values: AttributeValues,
}

impl GroupBuffer {
    fn new(attributes: Vec<String>) -> Self {
        let values = empty_values(&attributes);
        Self { attributes, values }
    }

    fn accepts(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    fn push(&mut self, token: &str, value: String) {
        if let Some(slot) = self.values.get_mut(token) {
            slot.push(value);
        }
    }

    fn first_attribute_value(&self) -> Option<&String> {
        self.attributes
            .first()
            .and_then(|first| self.values.get(first))
            .and_then(|values| values.first())
    }

    fn take(&mut self) -> AttributeValues {
        std::mem::replace(&mut self.values, empty_values(&self.attributes))
    }
}

fn empty_values(attributes: &[String]) -> AttributeValues {
    attributes
        .iter()
        .map(|attribute| (attribute.clone(), Vec::new()))
        .collect()
}

/// Extract attribute values grouped under `definition_token` lines.
///
/// Tokens are compared case-insensitively, values keep their case and lose
/// surrounding quotes. Blank lines and lines led by unknown tokens are skipped.
/// A definition (in [`NestedMode::ByDefinitionValue`]) or attribute line without
/// a value fails with [`ParseError::IndexOutOfRange`]; trailing whitespace is not
/// a value, an explicit `""` is.
///
/// In [`NestedMode::ByDefinitionValue`] the buffer pending at the end of input is
/// always emitted, even when empty, under the last definition seen (or `None`).
pub fn extract_nested<I, S, A>(
    lines: I,
    definition_token: &str,
    attribute_tokens: &[A],
    mode: NestedMode,
) -> ParseResult<NestedValues>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    A: AsRef<str>,
{
    let definition = definition_token.to_lowercase();
    let attributes: Vec<String> = attribute_tokens
        .iter()
        .map(|token| token.as_ref().to_lowercase())
        .collect();
    let tokenizer = Tokenizer::new()
        .max_splits(1)
        .preserve_case(true)
        .strip_quotes(true);

    let mut result = NestedValues::new();
    let mut buffer = GroupBuffer::new(attributes);
    let mut current: Option<String> = None;

    for line in lines {
        let line = line.as_ref();
        let tokens = tokenizer.tokenize(line)?;
        let Some(leading) = tokens.first() else {
            continue;
        };
        let leading = leading.to_lowercase();

        if leading == definition {
            match mode {
                NestedMode::ByDefinitionValue => {
                    let name = value_of(&tokens, line, &definition)?;
                    let group = buffer.take();
                    if let Some(key) = current.take() {
                        merge_group(&mut result, Some(key), group);
                    }
                    current = Some(name);
                }
                NestedMode::ByFirstAttributeValue => {
                    flush_by_first_attribute(&mut result, &mut buffer)
                }
            }
            continue;
        }

        if buffer.accepts(&leading) {
            let value = value_of(&tokens, line, &leading)?;
            buffer.push(&leading, value);
        }
    }

    match mode {
        NestedMode::ByDefinitionValue => merge_group(&mut result, current, buffer.take()),
        NestedMode::ByFirstAttributeValue => flush_by_first_attribute(&mut result, &mut buffer),
    }

    Ok(result)
}

fn value_of(tokens: &[String], line: &str, token: &str) -> ParseResult<String> {
    tokens
        .get(1)
        .cloned()
        .ok_or_else(|| ParseError::IndexOutOfRange {
            line: line.to_string(),
            token: token.to_string(),
            index: 1,
            len: tokens.len(),
        })
}

fn merge_group(result: &mut NestedValues, key: Option<String>, group: AttributeValues) {
    let entry = result.entry(key).or_default();
    for (attribute, values) in group {
        entry.entry(attribute).or_default().extend(values);
    }
}

fn flush_by_first_attribute(result: &mut NestedValues, buffer: &mut GroupBuffer) {
    match buffer.first_attribute_value().cloned() {
        Some(key) => {
            result.insert(Some(key), buffer.take());
        }
        None => {
            trace!("dropping group without a first attribute value");
            buffer.take();
        }
    }
}
