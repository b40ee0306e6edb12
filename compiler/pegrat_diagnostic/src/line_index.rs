//! Line start table for repeated position lookups.
//!
//! Computing a [`PositionInfo`](crate::PositionInfo) from scratch scans the
//! input up to the offset. Tracers ask for positions on nearly every rule
//! event, so they build a [`LineIndex`] once per input and resolve lines by
//! binary search.

use std::ops::Range;

/// Byte offsets of every line start in a source text.
///
/// # Example
///
/// ```
/// use pegrat_diagnostic::LineIndex;
///
/// let source = "ab\ncd\nef";
/// let index = LineIndex::build(source);
///
/// assert_eq!(index.line_of(0), 1);
/// assert_eq!(index.line_of(3), 2);
/// assert_eq!(index.line_range(source, 2), Some(3..5));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// `starts[0] == 0`; `starts[n]` is the byte after the n-th `\n`.
    starts: Vec<usize>,
}

impl LineIndex {
    /// Scan `source` once and record where each line begins.
    pub fn build(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { starts }
    }

    /// 1-based line number containing `offset`.
    ///
    /// A `\n` belongs to the line it terminates. Offsets past the end of the
    /// source resolve to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(exact) => exact + 1,
            Err(insert) => insert,
        }
    }

    /// Byte offset where the given 1-based line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|idx| self.starts.get(idx).copied())
    }

    /// Byte range of the given 1-based line, excluding its terminating `\n`.
    pub fn line_range(&self, source: &str, line: usize) -> Option<Range<usize>> {
        let start = self.line_start(line)?;
        let end = self
            .starts
            .get(line)
            .map_or(source.len(), |next_start| next_start - 1);
        Some(start..end)
    }

    /// Number of lines (an empty source has one empty line).
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
