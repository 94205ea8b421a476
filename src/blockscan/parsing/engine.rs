//! The block scanning state machine

use std::convert::Infallible;

use serde::Serialize;
use tracing::{debug, trace};

use super::hooks::{BlockHooks, Cursor};
use crate::blockscan::error::{ParseError, ParseResult};
use crate::blockscan::tree::{NodeId, Tree};

/// What a scan did, for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Lines handed to `on_update`, blank ones included.
    pub lines_seen: usize,
    /// `step_out` returned `None` and the remaining lines were skipped.
    pub terminated_early: bool,
    /// Value of the block depth counter when the scan ended.
    pub final_depth: i32,
    /// The current node when the scan ended.
    pub current: NodeId,
}

/// Scan `lines` and grow `tree` from its root using `hooks`.
///
/// Never fails: hooks that return inconsistent depth steps produce whatever tree
/// their steps imply. Pass `&mut hooks` to keep using the hook state afterwards.
pub fn parse_blocks<I, S, H>(lines: I, tree: &mut Tree<H::Key>, hooks: H) -> ScanSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    H: BlockHooks,
{
    match scan(lines, tree, hooks, Permissive) {
        Ok(summary) => summary,
        Err(never) => match never {},
    }
}

/// Like [`parse_blocks`] but checks the hooks' depth bookkeeping.
///
/// Fails with [`ParseError::MalformedNesting`] when `enter_block` returns anything
/// but 0 or 1, `exit_block` anything but 0 or -1, the depth drops below zero, or
/// input ends inside a block without the scan having been stopped by `step_out`.
/// The tree keeps whatever was built before the failure.
pub fn parse_blocks_strict<I, S, H>(
    lines: I,
    tree: &mut Tree<H::Key>,
    hooks: H,
) -> ParseResult<ScanSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    H: BlockHooks,
{
    scan(lines, tree, hooks, Strict)
}

/// Depth bookkeeping policy
trait Nesting {
    type Error;

    fn entered(&self, step: i32, at: Cursor<'_>) -> Result<(), Self::Error>;

    fn exited(&self, step: i32, depth: i32, at: Cursor<'_>) -> Result<(), Self::Error>;

    /// `last_line` is the last non-blank line and its number.
    fn finished(
        &self,
        summary: &ScanSummary,
        last_line: (usize, &str),
    ) -> Result<(), Self::Error>;
}

struct Permissive;

impl Nesting for Permissive {
    type Error = Infallible;

    fn entered(&self, _step: i32, _at: Cursor<'_>) -> Result<(), Infallible> {
        Ok(())
    }

    fn exited(&self, _step: i32, depth: i32, at: Cursor<'_>) -> Result<(), Infallible> {
        if depth < 0 {
            trace!(line_number = at.line_number, depth, "block depth below zero");
        }
        Ok(())
    }

    fn finished(
        &self,
        _summary: &ScanSummary,
        _last_line: (usize, &str),
    ) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Strict;

impl Strict {
    fn malformed(line_number: usize, line: &str, reason: String) -> ParseError {
        debug!(line_number, %reason, "malformed nesting");
        ParseError::MalformedNesting {
            line_number,
            line: line.to_string(),
            reason,
        }
    }
}

impl Nesting for Strict {
    type Error = ParseError;

    fn entered(&self, step: i32, at: Cursor<'_>) -> ParseResult<()> {
        if (0..=1).contains(&step) {
            Ok(())
        } else {
            Err(Self::malformed(
                at.line_number,
                at.line,
                format!("enter_block returned {step}"),
            ))
        }
    }

    fn exited(&self, step: i32, depth: i32, at: Cursor<'_>) -> ParseResult<()> {
        if !(-1..=0).contains(&step) {
            return Err(Self::malformed(
                at.line_number,
                at.line,
                format!("exit_block returned {step}"),
            ));
        }
        if depth < 0 {
            return Err(Self::malformed(
                at.line_number,
                at.line,
                "block closed that was never opened".to_string(),
            ));
        }
        Ok(())
    }

    fn finished(&self, summary: &ScanSummary, last_line: (usize, &str)) -> ParseResult<()> {
        if summary.terminated_early || summary.final_depth == 0 {
            return Ok(());
        }
        let (line_number, line) = last_line;
        Err(Self::malformed(
            line_number,
            line,
            format!("{} block(s) left open at end of input", summary.final_depth),
        ))
    }
}

fn scan<I, S, H, N>(
    lines: I,
    tree: &mut Tree<H::Key>,
    mut hooks: H,
    nesting: N,
) -> Result<ScanSummary, N::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    H: BlockHooks,
    N: Nesting,
{
    // depth: running counter moved by the predicates.
    // in_block: depth at the last observed enter/exit transition.
    let mut depth = 0i32;
    let mut in_block = 0i32;
    let mut node = tree.root();
    let mut lines_seen = 0usize;
    let mut last_line = String::new();
    let mut last_line_number = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let line_number = index + 1;
        lines_seen = line_number;
        let at = |node: NodeId, depth: i32| Cursor {
            line,
            line_number,
            node,
            depth,
        };

        hooks.on_update(tree, at(node, depth));
        if line.trim().is_empty() {
            continue;
        }
        last_line.clear();
        last_line.push_str(line);
        last_line_number = line_number;

        let step = hooks.enter_block(tree, at(node, depth));
        nesting.entered(step, at(node, depth))?;
        depth += step;
        if in_block < depth {
            in_block = depth;
            hooks.on_enter(tree, at(node, depth));
            if hooks.enter_key_block(tree, at(node, depth)) {
                node = hooks.step_in(tree, at(node, depth));
                trace!(line_number, depth, node = %node, "stepped into key block");
            }
            continue;
        }

        let step = hooks.exit_block(tree, at(node, depth));
        depth += step;
        nesting.exited(step, depth, at(node, depth))?;
        if in_block > depth {
            in_block = depth;
            hooks.on_exit(tree, at(node, depth));
            if hooks.exit_key_block(tree, at(node, depth)) {
                match hooks.step_out(tree, at(node, depth)) {
                    Some(next) => node = next,
                    None => {
                        debug!(line_number, depth, "step_out returned no node, ending scan");
                        return Ok(ScanSummary {
                            lines_seen,
                            terminated_early: true,
                            final_depth: depth,
                            current: node,
                        });
                    }
                }
            }
            continue;
        }

        hooks.on_other(tree, at(node, depth));
    }

    let summary = ScanSummary {
        lines_seen,
        terminated_early: false,
        final_depth: depth,
        current: node,
    };
    nesting.finished(&summary, (last_line_number, &last_line))?;
    Ok(summary)
}
