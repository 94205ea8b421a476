//! Regex-driven hooks
//!
//! A ready-made [`BlockHooks`] implementation for the common "marker opens, marker
//! closes" formats, e.g.
//!
//!     shader "rock" {        <- enter marker, key pattern captures `rock`
//!         map rock.png       <- body line
//!         {                  <- enter marker, not a key block
//!         }
//!     }
//!
//! Key blocks become [`Section`] nodes carrying their name, the line they start
//! on and, optionally, their body lines.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use super::hooks::{BlockHooks, Cursor};
use crate::blockscan::tree::{NodeId, Tree};

/// Node payload built by [`PatternHooks`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    /// 1-based line the block starts on; 0 for the root.
    pub line_number: usize,
    /// Lines inside the block that neither open nor close one, trimmed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

impl Section {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line_number: 0,
            lines: Vec::new(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Classifies lines with regular expressions.
///
/// - `enter` matching a line opens a block, `exit` closes one.
/// - An opened block is a key block when `key` matches its opening line; the
///   first capture group (or the whole match) names the node.
/// - With `stop_after`, the scan ends as soon as a key block whose name matches
///   closes.
#[derive(Debug, Clone)]
pub struct PatternHooks {
    enter: Regex,
    exit: Regex,
    key: Option<Regex>,
    stop_after: Option<Regex>,
    keep_lines: bool,
    open: Vec<bool>,
}

impl PatternHooks {
    pub fn new(enter: Regex, exit: Regex) -> Self {
        Self {
            enter,
            exit,
            key: None,
            stop_after: None,
            keep_lines: false,
            open: Vec::new(),
        }
    }

    /// Blocks whose opening line matches `key` become nodes.
    pub fn with_key(mut self, key: Regex) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_stop_after(mut self, stop_after: Regex) -> Self {
        self.stop_after = Some(stop_after);
        self
    }

    /// Record body lines on the current node.
    pub fn keep_lines(mut self, yes: bool) -> Self {
        self.keep_lines = yes;
        self
    }

    fn key_name(&self, line: &str) -> Option<String> {
        let captures = self.key.as_ref()?.captures(line)?;
        let name = captures.get(1).or_else(|| captures.get(0))?;
        Some(name.as_str().trim().to_string())
    }
}

impl BlockHooks for PatternHooks {
    type Key = Section;

    fn enter_block(&mut self, _tree: &Tree<Section>, at: Cursor<'_>) -> i32 {
        i32::from(self.enter.is_match(at.line))
    }

    fn exit_block(&mut self, _tree: &Tree<Section>, at: Cursor<'_>) -> i32 {
        -i32::from(self.exit.is_match(at.line))
    }

    fn enter_key_block(&mut self, _tree: &Tree<Section>, at: Cursor<'_>) -> bool {
        let is_key = self.key_name(at.line).is_some();
        self.open.push(is_key);
        is_key
    }

    fn exit_key_block(&mut self, _tree: &Tree<Section>, _at: Cursor<'_>) -> bool {
        self.open.pop().unwrap_or(false)
    }

    fn step_in(&mut self, tree: &mut Tree<Section>, at: Cursor<'_>) -> NodeId {
        let name = self.key_name(at.line).unwrap_or_default();
        let section = Section {
            name,
            line_number: at.line_number,
            lines: Vec::new(),
        };
        tree.push_child(at.node, section)
    }

    fn step_out(&mut self, tree: &mut Tree<Section>, at: Cursor<'_>) -> Option<NodeId> {
        let closing = &tree.key(at.node).name;
        if self
            .stop_after
            .as_ref()
            .is_some_and(|stop| stop.is_match(closing))
        {
            return None;
        }
        tree.parent(at.node).or(Some(at.node))
    }

    fn on_other(&mut self, tree: &mut Tree<Section>, at: Cursor<'_>) {
        if self.keep_lines {
            tree.key_mut(at.node).lines.push(at.line.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockscan::parsing::parse_blocks;

    const MATERIAL: &str = r#"
shader "rock" {
    map rock.png
    {
        blend add
    }
    stage "detail" {
        map detail.png
    }
}
shader "sand" {
    map sand.png
}
"#;

    fn hooks() -> PatternHooks {
        PatternHooks::new(Regex::new(r"\{\s*$").unwrap(), Regex::new(r"^\s*\}").unwrap())
            .with_key(Regex::new(r#"^\s*\w+\s+"([^"]+)""#).unwrap())
    }

    #[test]
    fn test_key_blocks_become_sections() {
        let mut tree = Tree::new(Section::root("material"));
        parse_blocks(MATERIAL.lines(), &mut tree, hooks());

        insta::assert_snapshot!(tree.to_string(), @r"
        material
          rock
            detail
          sand
        ");
        let detail = tree.descendants(tree.root()).nth(1).unwrap();
        assert_eq!(tree.key(detail).line_number, 7);
        assert_eq!(tree.depth(detail), 2);
    }

    #[test]
    fn test_body_lines_are_kept_on_request() {
        let mut tree = Tree::new(Section::root("material"));
        parse_blocks(MATERIAL.lines(), &mut tree, hooks().keep_lines(true));

        let rock = tree.children(tree.root())[0];
        assert_eq!(tree.key(rock).lines, vec!["map rock.png", "blend add"]);
    }

    #[test]
    fn test_stop_after_ends_scan() {
        let mut tree = Tree::new(Section::root("material"));
        let summary = parse_blocks(
            MATERIAL.lines(),
            &mut tree,
            hooks().with_stop_after(Regex::new("^rock$").unwrap()),
        );

        assert!(summary.terminated_early);
        assert_eq!(summary.lines_seen, 10);
        assert_eq!(tree.children(tree.root()).len(), 1);
    }
}
