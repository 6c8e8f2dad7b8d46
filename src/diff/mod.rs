//! Line diff engine
//!
//! Compares two texts line by line (exact match, whitespace included) and
//! produces hunk-grouped [`DiffResult`]s numbered the way unified diffs are:
//! context and removed lines advance the original-file counter, added lines
//! carry it without advancing.

mod hunks;
mod myers;

pub use hunks::group_hunks;
pub use myers::{edit_script, EditOp};

use crate::types::DiffResult;

/// Unchanged lines kept around each change by default
pub const DEFAULT_CONTEXT: usize = 3;

/// Split text into lines with `\n` / `\r\n` terminators stripped
///
/// An empty text has zero lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Diff two texts with the default context size
pub fn diff_texts(original: &str, modified: &str) -> DiffResult {
    diff_texts_with_context(original, modified, DEFAULT_CONTEXT)
}

/// Diff two texts keeping `context` unchanged lines around each change
pub fn diff_texts_with_context(original: &str, modified: &str, context: usize) -> DiffResult {
    diff_lines(&split_lines(original), &split_lines(modified), context)
}

/// Diff two optional texts; a missing side counts as zero lines
pub fn diff_optional(original: Option<&str>, modified: Option<&str>, context: usize) -> DiffResult {
    diff_texts_with_context(original.unwrap_or(""), modified.unwrap_or(""), context)
}

/// Diff two line sequences
pub fn diff_lines(original: &[&str], modified: &[&str], context: usize) -> DiffResult {
    let ops = edit_script(original, modified);
    group_hunks(&ops, original, modified, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiffLine, DiffLineKind};

    fn l(line_number: usize, kind: DiffLineKind, content: &str) -> DiffLine {
        DiffLine {
            line_number,
            kind,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_single_substitution() {
        let result = diff_texts("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            result.lines(),
            vec![
                l(1, DiffLineKind::Context, "a"),
                l(2, DiffLineKind::Removed, "b"),
                l(3, DiffLineKind::Added, "x"),
                l(3, DiffLineKind::Context, "c"),
            ]
        );
        assert_eq!(result.additions(), 1);
        assert_eq!(result.deletions(), 1);
    }

    #[test]
    fn test_added_file() {
        let result = diff_texts("", "a\nb");
        assert_eq!(
            result.lines(),
            vec![l(0, DiffLineKind::Added, "a"), l(0, DiffLineKind::Added, "b")]
        );
        assert_eq!(result.additions(), 2);
        assert_eq!(result.deletions(), 0);
        assert_eq!(result.hunks[0].header(), "@@ -0,0 +1,2 @@");
    }

    #[test]
    fn test_removed_file() {
        let result = diff_optional(Some("a\nb\n"), None, DEFAULT_CONTEXT);
        assert_eq!(result.deletions(), 2);
        assert_eq!(result.additions(), 0);
        assert!(result.lines().iter().all(|line| line.kind == DiffLineKind::Removed));
    }

    #[test]
    fn test_identical_is_empty() {
        let text = "fn main() {}\n  indented\n";
        let result = diff_texts(text, text);
        assert!(result.is_empty());
        assert_eq!(result.additions(), 0);
        assert_eq!(result.deletions(), 0);
    }

    #[test]
    fn test_whitespace_is_significant() {
        let result = diff_texts("x = 1\n", "x = 1 \n");
        assert_eq!(result.additions(), 1);
        assert_eq!(result.deletions(), 1);
    }

    #[test]
    fn test_crlf_matches_lf() {
        assert!(diff_texts("a\r\nb\r\n", "a\nb\n").is_empty());
    }

    #[test]
    fn test_distant_changes_split_into_hunks() {
        let original: Vec<String> = (1..=20).map(|i| format!("line {}", i)).collect();
        let mut modified = original.clone();
        modified[1] = "changed 2".to_string();
        modified[17] = "changed 18".to_string();

        let result = diff_texts(&original.join("\n"), &modified.join("\n"));
        assert_eq!(result.hunks.len(), 2);

        let first = &result.hunks[0];
        assert_eq!(first.original_start, 1);
        assert_eq!(first.original_len, 5);
        assert_eq!(first.header(), "@@ -1,5 +1,5 @@");

        let second = &result.hunks[1];
        assert_eq!(second.original_start, 15);
        assert_eq!(second.lines[0], l(15, DiffLineKind::Context, "line 15"));
        assert_eq!(second.lines[3], l(18, DiffLineKind::Removed, "line 18"));
        assert_eq!(second.lines[4], l(19, DiffLineKind::Added, "changed 18"));
        assert_eq!(second.lines[5], l(19, DiffLineKind::Context, "line 19"));
    }

    #[test]
    fn test_nearby_changes_share_a_hunk() {
        let original = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10";
        let modified = "1\nX\n3\n4\n5\n6\n7\n8\nY\n10";
        let result = diff_texts(original, modified);
        assert_eq!(result.hunks.len(), 1);
        assert_eq!(result.hunks[0].original_len, 10);
    }

    #[test]
    fn test_zero_context() {
        let result = diff_texts_with_context("a\nb\nc", "a\nx\nc", 0);
        assert_eq!(
            result.lines(),
            vec![l(2, DiffLineKind::Removed, "b"), l(3, DiffLineKind::Added, "x")]
        );
    }

    #[test]
    fn test_pure_insertion_numbering() {
        let result = diff_texts("a\nb\n", "a\nnew\nb\n");
        assert_eq!(
            result.lines(),
            vec![
                l(1, DiffLineKind::Context, "a"),
                l(2, DiffLineKind::Added, "new"),
                l(2, DiffLineKind::Context, "b"),
            ]
        );
        assert_eq!(result.hunks[0].header(), "@@ -1,2 +1,3 @@");
    }

    #[test]
    fn test_unified_rendering() {
        let result = diff_texts("a\nb\nc", "a\nx\nc");
        assert_eq!(
            result.to_unified("app/main.py", "patches/main.py"),
            "--- app/main.py\n+++ patches/main.py\n@@ -1,3 +1,3 @@\n a\n-b\n+x\n c\n"
        );
        assert_eq!(diff_texts("same", "same").to_unified("a", "b"), "");
    }
}
