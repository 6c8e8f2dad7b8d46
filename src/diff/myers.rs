//! Minimal line edit script (Myers O(ND), linear space)
//!
//! Lines that occur on only one side can never be matched, so they are set
//! aside before the search and reported as plain deletions or insertions.
//! Every subproblem then matches its common prefix and suffix first, so an
//! unchanged line at either end of a change block is always kept as context.
//! The remaining block is split at the middle snake of an optimal path and
//! both halves are solved recursively; the search only keeps two frontiers,
//! so memory stays proportional to the input. Within each run of changes,
//! deletions are ordered before insertions.

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::{Index, IndexMut, Range};

/// One step of an edit script, with indices into the two line sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Equal { original: usize, modified: usize },
    Delete { original: usize },
    Insert { modified: usize },
}

impl EditOp {
    pub fn is_change(&self) -> bool {
        !matches!(self, EditOp::Equal { .. })
    }
}

/// Compute a minimal edit script turning `a` into `b`
pub fn edit_script<T: Hash + Eq>(a: &[T], b: &[T]) -> Vec<EditOp> {
    let in_a: HashSet<&T> = a.iter().collect();
    let in_b: HashSet<&T> = b.iter().collect();
    let a_kept: Vec<usize> = (0..a.len()).filter(|&i| in_b.contains(&a[i])).collect();
    let b_kept: Vec<usize> = (0..b.len()).filter(|&j| in_a.contains(&b[j])).collect();
    let a_lines: Vec<&T> = a_kept.iter().map(|&i| &a[i]).collect();
    let b_lines: Vec<&T> = b_kept.iter().map(|&j| &b[j]).collect();

    let d_max = max_d(a_lines.len(), b_lines.len());
    let mut search = Search {
        a: &a_lines,
        b: &b_lines,
        forward: Frontier::new(d_max),
        backward: Frontier::new(d_max),
        matches: Vec::new(),
    };
    search.conquer(0..a_lines.len(), 0..b_lines.len());

    let matches = search
        .matches
        .into_iter()
        .map(|(i, j)| (a_kept[i], b_kept[j]));
    deletions_first(build_ops(a.len(), b.len(), matches))
}

/// Expand matched pairs into a full script over both sequences
fn build_ops(
    n: usize,
    m: usize,
    matches: impl Iterator<Item = (usize, usize)>,
) -> Vec<EditOp> {
    let mut ops = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);

    for (original, modified) in matches {
        ops.extend((i..original).map(|original| EditOp::Delete { original }));
        ops.extend((j..modified).map(|modified| EditOp::Insert { modified }));
        ops.push(EditOp::Equal { original, modified });
        i = original + 1;
        j = modified + 1;
    }
    ops.extend((i..n).map(|original| EditOp::Delete { original }));
    ops.extend((j..m).map(|modified| EditOp::Insert { modified }));

    ops
}

/// Upper bound on the search depth for one half of a middle-snake search
fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

/// Furthest-reaching x on each diagonal, indexed by signed diagonal `k`
struct Frontier {
    offset: isize,
    v: Vec<usize>,
}

impl Frontier {
    fn new(d_max: usize) -> Self {
        Self {
            offset: d_max as isize,
            v: vec![0; 2 * d_max + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

/// Divide-and-conquer state shared by every subproblem
struct Search<'a, T> {
    a: &'a [T],
    b: &'a [T],
    forward: Frontier,
    backward: Frontier,
    /// Matched `(a, b)` index pairs in increasing order
    matches: Vec<(usize, usize)>,
}

impl<T: PartialEq> Search<'_, T> {
    fn conquer(&mut self, mut a_range: Range<usize>, mut b_range: Range<usize>) {
        let prefix = self.common_prefix(a_range.clone(), b_range.clone());
        self.push_equal(a_range.start, b_range.start, prefix);
        a_range.start += prefix;
        b_range.start += prefix;

        let suffix = self.common_suffix(a_range.clone(), b_range.clone());
        a_range.end -= suffix;
        b_range.end -= suffix;
        let (a_tail, b_tail) = (a_range.end, b_range.end);

        if !a_range.is_empty() && !b_range.is_empty() {
            if let Some((x, y)) = self.middle_snake(a_range.clone(), b_range.clone()) {
                self.conquer(a_range.start..x, b_range.start..y);
                self.conquer(x..a_range.end, y..b_range.end);
            }
        }

        self.push_equal(a_tail, b_tail, suffix);
    }

    fn push_equal(&mut self, a_start: usize, b_start: usize, len: usize) {
        self.matches
            .extend((0..len).map(|offset| (a_start + offset, b_start + offset)));
    }

    fn common_prefix(&self, a_range: Range<usize>, b_range: Range<usize>) -> usize {
        self.a[a_range]
            .iter()
            .zip(&self.b[b_range])
            .take_while(|(x, y)| x == y)
            .count()
    }

    fn common_suffix(&self, a_range: Range<usize>, b_range: Range<usize>) -> usize {
        self.a[a_range]
            .iter()
            .rev()
            .zip(self.b[b_range].iter().rev())
            .take_while(|(x, y)| x == y)
            .count()
    }

    /// Find a point on an optimal path that splits the edit cost in half
    ///
    /// Runs the greedy search forward from the top-left corner and backward
    /// from the bottom-right corner in lockstep until the two frontiers
    /// overlap on a diagonal.
    fn middle_snake(
        &mut self,
        a_range: Range<usize>,
        b_range: Range<usize>,
    ) -> Option<(usize, usize)> {
        let n = a_range.len();
        let m = b_range.len();
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;
        self.forward[1] = 0;
        self.backward[1] = 0;

        for d in 0..max_d(n, m) as isize {
            for k in (-d..=d).rev().step_by(2) {
                let vf = &self.forward;
                let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                    vf[k + 1]
                } else {
                    vf[k - 1] + 1
                };
                let y = (x as isize - k) as usize;
                let (x0, y0) = (x, y);
                if x < n && y < m {
                    x += self.common_prefix(
                        a_range.start + x..a_range.end,
                        b_range.start + y..b_range.end,
                    );
                }
                self.forward[k] = x;

                if odd && (k - delta).abs() <= d - 1 && x + self.backward[-(k - delta)] >= n {
                    return Some((a_range.start + x0, b_range.start + y0));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let vb = &self.backward;
                let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                    vb[k + 1]
                } else {
                    vb[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;
                if x < n && y < m {
                    let advance = self.common_suffix(
                        a_range.start..a_range.start + n - x,
                        b_range.start..b_range.start + m - y,
                    );
                    x += advance;
                    y += advance;
                }
                self.backward[k] = x;

                if !odd && (k - delta).abs() <= d && x + self.forward[-(k - delta)] >= n {
                    return Some((a_range.start + n - x, b_range.start + m - y));
                }
            }
        }

        None
    }
}

/// Reorder each contiguous change run as all deletions, then all insertions
fn deletions_first(ops: Vec<EditOp>) -> Vec<EditOp> {
    let mut out = Vec::with_capacity(ops.len());
    let mut deletes = Vec::new();
    let mut inserts = Vec::new();

    for op in ops {
        match op {
            EditOp::Delete { .. } => deletes.push(op),
            EditOp::Insert { .. } => inserts.push(op),
            EditOp::Equal { .. } => {
                out.append(&mut deletes);
                out.append(&mut inserts);
                out.push(op);
            }
        }
    }
    out.append(&mut deletes);
    out.append(&mut inserts);
    out
}
