//! Rendering of the farthest parse failure.

use std::fmt;

use crate::position::{PositionInfo, Underline};

/// What the parser expected at the farthest position it reached.
///
/// Rendered as
///
/// ```text
/// Error on line <N>. Expected: <e1>, <e2>, ... instead of '<ch>'
/// <source line>
/// <caret line>
/// ```
///
/// Expectations keep the order in which they were first registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorDescription {
    position: usize,
    expectations: Vec<String>,
    info: PositionInfo,
    underline: Underline,
}

impl ErrorDescription {
    /// Describe a failure at byte `position` of `source`.
    pub fn new<I, S>(source: &str, position: usize, expectations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ErrorDescription {
            position,
            expectations: expectations.into_iter().map(Into::into).collect(),
            info: PositionInfo::new(source, position),
            underline: Underline::default(),
        }
    }

    /// Use different characters for the caret line.
    #[must_use]
    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    /// Byte offset of the failure.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expectations(&self) -> &[String] {
        &self.expectations
    }

    pub fn position_info(&self) -> &PositionInfo {
        &self.info
    }

    /// The first line of the message, without the source excerpt.
    pub fn summary(&self) -> String {
        format!(
            "Error on line {}. Expected: {} instead of '{}'",
            self.info.line_number(),
            self.expectations.join(", "),
            self.info.position_char()
        )
    }
}

impl fmt::Display for ErrorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}",
            self.summary(),
            self.info.line(),
            self.info.underline(self.underline)
        )
    }
}
