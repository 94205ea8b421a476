//! Configuration loading
//!
//! `defaults/blockscan.default.toml` is embedded into the binary. User files and
//! command-line settings are layered on top through [`Loader`] before the result
//! is deserialized into [`ScanConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::blockscan::formats::OutputFormat;
use crate::blockscan::lexing::{TokenStyle, Tokenizer};
use crate::blockscan::parsing::PatternHooks;

const DEFAULT_TOML: &str = include_str!("../../defaults/blockscan.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub styles: Vec<TokenStyle>,
    pub blocks: BlocksConfig,
    pub output: OutputConfig,
}

/// Mirrors the [`Tokenizer`] options.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    pub separators: String,
    pub max_splits: i32,
    pub split_inside_quotes: bool,
    pub preserve_case: bool,
    pub strip_quotes: bool,
}

impl TokenizerConfig {
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new()
            .separators(self.separators.as_str())
            .max_splits(self.max_splits)
            .split_inside_quotes(self.split_inside_quotes)
            .preserve_case(self.preserve_case)
            .strip_quotes(self.strip_quotes)
    }
}

/// Patterns for the regex-driven block scan.
#[derive(Debug, Clone, Deserialize)]
pub struct BlocksConfig {
    pub root: String,
    pub enter: String,
    pub exit: String,
    pub key: Option<String>,
    pub stop_after: Option<String>,
    pub keep_lines: bool,
}

impl BlocksConfig {
    /// Compile the patterns into hooks ready for a scan.
    pub fn hooks(&self) -> Result<PatternHooks, regex::Error> {
        let mut hooks = PatternHooks::new(Regex::new(&self.enter)?, Regex::new(&self.exit)?)
            .keep_lines(self.keep_lines);
        if let Some(key) = &self.key {
            hooks = hooks.with_key(Regex::new(key)?);
        }
        if let Some(stop_after) = &self.stop_after {
            hooks = hooks.with_stop_after(Regex::new(stop_after)?);
        }
        Ok(hooks)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Stack of configuration sources, later ones winning key by key.
///
/// The embedded `blockscan.default.toml` is always at the bottom, so every
/// [`ScanConfig`] field has a value even when no user file is given.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// `--config` files: [`build`](Self::build) fails when the file is missing.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_file(path.as_ref(), true)
    }

    /// Per-user or per-project files that may not exist.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_file(path.as_ref(), false)
    }

    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Dotted key such as `output.format`; wins over every layered source.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn layer_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<ScanConfig, ConfigError> {
    Loader::new().build()
}
