//! Dropping blocks from a line list

/// Return `lines` without the blocks that `is_block_start` identifies.
///
/// The identified line is always dropped and `enter` gives the depth it opens
/// (usually 1). While the depth is above zero every line is dropped and `exit`
/// gives its net depth change, so nested openings inside the block should count
/// +1 and closings -1.
pub fn strip_blocks<I, S, F, E, X>(
    lines: I,
    mut is_block_start: F,
    mut enter: E,
    mut exit: X,
) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str) -> bool,
    E: FnMut(&str) -> i32,
    X: FnMut(&str) -> i32,
{
    let mut kept = Vec::new();
    let mut depth = 0i32;

    for line in lines {
        let text = line.as_ref();
        if is_block_start(text) {
            depth += enter(text);
            continue;
        }
        if depth > 0 {
            depth += exit(text);
            continue;
        }
        kept.push(line);
    }

    kept
}
