//! Human-readable view of a byte offset.

use std::fmt;

use crate::line_index::LineIndex;

/// Characters used to draw the caret line under a source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Underline {
    /// Fills every column except the marked one.
    pub spacer: char,
    /// Drawn at the column of the position.
    pub marker: char,
}

impl Underline {
    pub const fn new(spacer: char, marker: char) -> Self {
        Underline { spacer, marker }
    }
}

impl Default for Underline {
    fn default() -> Self {
        Underline::new(' ', '^')
    }
}

/// The character found at a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionChar {
    Char(char),
    /// The position is at (or past) the end of the input.
    EndOfInput,
}

impl fmt::Display for PositionChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionChar::Char(c) => write!(f, "{c}"),
            PositionChar::EndOfInput => f.write_str("EOI"),
        }
    }
}

/// Line, column and character at a byte offset of a source text.
///
/// Columns count characters, not bytes, so the caret line lines up with
/// the source line for multi-byte input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionInfo {
    offset: usize,
    line_number: usize,
    line: String,
    column: usize,
    position_char: PositionChar,
}

impl PositionInfo {
    /// Compute the position info by scanning `source` up to `offset`.
    ///
    /// Offsets past the end are clamped to the end; offsets inside a
    /// multi-byte character are moved back to its first byte.
    pub fn new(source: &str, offset: usize) -> Self {
        let offset = floor_char_boundary(source, offset);
        let line_start = source[..offset].rfind('\n').map_or(0, |nl| nl + 1);
        let line_end = source[line_start..]
            .find('\n')
            .map_or(source.len(), |nl| line_start + nl);
        let line_number = 1 + source[..line_start].bytes().filter(|&b| b == b'\n').count();
        Self::from_parts(source, offset, line_number, line_start, line_end)
    }

    /// Compute the position info with a pre-built [`LineIndex`] for `source`.
    pub fn with_index(source: &str, index: &LineIndex, offset: usize) -> Self {
        let offset = floor_char_boundary(source, offset);
        let line_number = index.line_of(offset);
        let range = index
            .line_range(source, line_number)
            .unwrap_or(offset..offset);
        Self::from_parts(source, offset, line_number, range.start, range.end)
    }

    fn from_parts(
        source: &str,
        offset: usize,
        line_number: usize,
        line_start: usize,
        line_end: usize,
    ) -> Self {
        let position_char = source[offset..]
            .chars()
            .next()
            .map_or(PositionChar::EndOfInput, PositionChar::Char);
        PositionInfo {
            offset,
            line_number,
            line: source[line_start..line_end].to_owned(),
            column: source[line_start..offset].chars().count(),
            position_char,
        }
    }

    /// Byte offset this info describes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line number.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The full line containing the position, without its `\n`.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// 0-based column, in characters from the start of the line.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn position_char(&self) -> PositionChar {
        self.position_char
    }

    /// A line as wide as the source line with `marker` under the position.
    ///
    /// When the position is past the last character of the line the line
    /// is extended so the marker is still drawn.
    pub fn underline(&self, underline: Underline) -> String {
        let width = self.line.chars().count().max(self.column + 1);
        (0..width)
            .map(|col| {
                if col == self.column {
                    underline.marker
                } else {
                    underline.spacer
                }
            })
            .collect()
    }
}

impl fmt::Display for PositionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}\n{}\n{}",
            self.line_number,
            self.line,
            self.underline(Underline::default())
        )
    }
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests;
