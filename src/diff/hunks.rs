//! Hunk grouping and unified-diff line numbering

use super::myers::EditOp;
use crate::types::{DiffLine, DiffLineKind, DiffResult, Hunk};

/// Group an edit script into hunks with `context` unchanged lines around
/// each change. Change blocks separated by at most `2 * context` unchanged
/// lines share a hunk.
pub fn group_hunks(
    ops: &[EditOp],
    original: &[&str],
    modified: &[&str],
    context: usize,
) -> DiffResult {
    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| op.is_change())
        .map(|(i, _)| i)
        .collect();

    let mut result = DiffResult::default();
    let Some(&first) = changes.first() else {
        return result;
    };

    let mut cluster_start = first;
    let mut cluster_end = first;
    for &position in &changes[1..] {
        if position - cluster_end - 1 > 2 * context {
            let hunk = build_hunk(ops, original, modified, cluster_start, cluster_end, context);
            result.hunks.push(hunk);
            cluster_start = position;
        }
        cluster_end = position;
    }
    let hunk = build_hunk(ops, original, modified, cluster_start, cluster_end, context);
    result.hunks.push(hunk);

    for line in result.hunks.iter().flat_map(|h| &h.lines) {
        match line.kind {
            DiffLineKind::Added => result.changes_count.additions += 1,
            DiffLineKind::Removed => result.changes_count.deletions += 1,
            DiffLineKind::Context => {}
        }
    }

    result
}

fn build_hunk(
    ops: &[EditOp],
    original: &[&str],
    modified: &[&str],
    first_change: usize,
    last_change: usize,
    context: usize,
) -> Hunk {
    let start = first_change.saturating_sub(context);
    let end = (last_change + 1 + context).min(ops.len());
    let window = &ops[start..end];

    let (original_first, modified_first) = positions_before(ops, start);
    let original_len = window.iter().filter(|op| !matches!(op, EditOp::Insert { .. })).count();
    let modified_len = window.iter().filter(|op| !matches!(op, EditOp::Delete { .. })).count();

    let original_start = reported_start(original_first, original_len);
    let modified_start = reported_start(modified_first, modified_len);

    let mut counter = original_start;
    let lines = window
        .iter()
        .map(|op| match *op {
            EditOp::Equal { original: i, .. } => {
                let line = diff_line(counter, DiffLineKind::Context, original[i]);
                counter += 1;
                line
            }
            EditOp::Delete { original: i } => {
                let line = diff_line(counter, DiffLineKind::Removed, original[i]);
                counter += 1;
                line
            }
            EditOp::Insert { modified: j } => diff_line(counter, DiffLineKind::Added, modified[j]),
        })
        .collect();

    Hunk {
        original_start,
        original_len,
        modified_start,
        modified_len,
        lines,
    }
}

/// Zero-based positions in each sequence just before `ops[index]`
fn positions_before(ops: &[EditOp], index: usize) -> (usize, usize) {
    ops[..index].iter().fold((0, 0), |(a, b), op| match op {
        EditOp::Equal { .. } => (a + 1, b + 1),
        EditOp::Delete { .. } => (a + 1, b),
        EditOp::Insert { .. } => (a, b + 1),
    })
}

/// Unified-diff range start: one-based, or the preceding line for an empty range
fn reported_start(first: usize, len: usize) -> usize {
    if len == 0 {
        first
    } else {
        first + 1
    }
}

fn diff_line(line_number: usize, kind: DiffLineKind, content: &str) -> DiffLine {
    DiffLine {
        line_number,
        kind,
        content: content.to_string(),
    }
}
