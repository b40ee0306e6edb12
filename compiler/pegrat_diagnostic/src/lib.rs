//! Source positions and error messages for pegrat.
//!
//! The parsing engine only knows byte offsets into its input. This crate
//! turns an offset into something a human can read:
//!
//! - [`PositionInfo`]: line number, line text, column and the character
//!   found at the offset (or `EOI` past the last character)
//! - [`ErrorDescription`]: the farthest failure of a parse run rendered as
//!   `Error on line N. Expected: a, b instead of 'c'` followed by the source
//!   line and a caret line
//! - [`LineIndex`]: pre-computed line starts for repeated lookups on the
//!   same input (used by tracers that print positions for every event)
//!
//! # Example
//!
//! ```
//! use pegrat_diagnostic::ErrorDescription;
//!
//! let desc = ErrorDescription::new("1+2%3", 3, ["sum", "End Of Input"]);
//! assert_eq!(
//!     desc.to_string(),
//!     "Error on line 1. Expected: sum, End Of Input instead of '%'\n1+2%3\n   ^ "
//! );
//! ```

mod description;
pub mod line_index;
mod position;

pub use description::ErrorDescription;
pub use line_index::LineIndex;
pub use position::{PositionChar, PositionInfo, Underline};
