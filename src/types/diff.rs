//! Line diff types

use serde::{Deserialize, Serialize};

/// Classification of a diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineKind {
    Added,
    Removed,
    Context,
}

impl DiffLineKind {
    /// Unified-diff line prefix
    pub fn marker(&self) -> char {
        match self {
            DiffLineKind::Added => '+',
            DiffLineKind::Removed => '-',
            DiffLineKind::Context => ' ',
        }
    }
}

/// One rendered diff line
///
/// `line_number` follows the original file's numbering, restarting from each
/// hunk's reported start. Added lines carry the counter without advancing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub line_number: usize,
    #[serde(rename = "type")]
    pub kind: DiffLineKind,
    pub content: String,
}

/// Contiguous run of context/removed/added lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Reported start in the original file (unified-diff convention)
    pub original_start: usize,
    pub original_len: usize,
    pub modified_start: usize,
    pub modified_len: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// `@@ -a,b +c,d @@` header line
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.original_start, self.original_len),
            format_range(self.modified_start, self.modified_len)
        )
    }
}

fn format_range(start: usize, len: usize) -> String {
    if len == 1 {
        start.to_string()
    } else {
        format!("{},{}", start, len)
    }
}

/// Added/removed line counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub additions: usize,
    pub deletions: usize,
}

/// Structured diff between two texts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub hunks: Vec<Hunk>,
    pub changes_count: ChangeCounts,
}

impl DiffResult {
    /// Every line of every hunk, in order
    pub fn lines(&self) -> Vec<DiffLine> {
        self.hunks.iter().flat_map(|h| h.lines.iter().cloned()).collect()
    }

    pub fn additions(&self) -> usize {
        self.changes_count.additions
    }

    pub fn deletions(&self) -> usize {
        self.changes_count.deletions
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Render as unified-diff text
    pub fn to_unified(&self, original_name: &str, modified_name: &str) -> String {
        if self.hunks.is_empty() {
            return String::new();
        }

        let mut out = format!("--- {}\n+++ {}\n", original_name, modified_name);
        for hunk in &self.hunks {
            out.push_str(&hunk.header());
            out.push('\n');
            for line in &hunk.lines {
                out.push(line.kind.marker());
                out.push_str(&line.content);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunk_header_ranges() {
        let hunk = Hunk {
            original_start: 1,
            original_len: 3,
            modified_start: 1,
            modified_len: 1,
            lines: Vec::new(),
        };
        assert_eq!(hunk.header(), "@@ -1,3 +1 @@");

        let insertion = Hunk {
            original_start: 0,
            original_len: 0,
            modified_start: 1,
            modified_len: 2,
            lines: Vec::new(),
        };
        assert_eq!(insertion.header(), "@@ -0,0 +1,2 @@");
    }

    #[test]
    fn test_line_kind_serializes_as_type() {
        let line = DiffLine {
            line_number: 2,
            kind: DiffLineKind::Removed,
            content: "b".to_string(),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json, serde_json::json!({"line_number": 2, "type": "removed", "content": "b"}));
    }
}
