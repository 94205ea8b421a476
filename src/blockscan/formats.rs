//! Output formats
//!
//! Turns scan results into text. Trees go through a [`TreeSnapshot`] so that the
//! serde-based formats and the treeviz view agree on the structure.
//!
//!     treeviz   one line per node, two spaces per level
//!     json      pretty-printed serde_json
//!     yaml      serde_yaml

pub mod snapshot;
pub mod treeviz;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockscan::extraction::{NestedValues, TokenValues};
use crate::blockscan::tree::Tree;

pub use snapshot::{nested_snapshot, snapshot, TreeSnapshot, UNNAMED_GROUP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Treeviz,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Treeviz,
        OutputFormat::Json,
        OutputFormat::Yaml,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown output format '{0}' (expected treeviz, json or yaml)")]
    UnknownFormat(String),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serde formats share one path; treeviz needs a dedicated view per value type.
fn render<T, F>(value: &T, format: OutputFormat, treeviz: F) -> Result<String, FormatError>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Treeviz => Ok(treeviz()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

pub fn render_tree<K>(tree: &Tree<K>, format: OutputFormat) -> Result<String, FormatError>
where
    K: Serialize + fmt::Display,
{
    render(&snapshot(tree), format, || tree.to_string())
}

pub fn render_token_values(
    values: &TokenValues,
    format: OutputFormat,
) -> Result<String, FormatError> {
    render(values, format, || treeviz::token_values(values))
}

pub fn render_nested(values: &NestedValues, format: OutputFormat) -> Result<String, FormatError> {
    render(&nested_snapshot(values), format, || {
        treeviz::nested_values(values)
    })
}

/// One token list per input line.
pub fn render_tokens(tokens: &[Vec<String>], format: OutputFormat) -> Result<String, FormatError> {
    render(tokens, format, || treeviz::token_lines(tokens))
}
