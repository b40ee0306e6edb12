//! Parse state and snapshots for backtracking.
//!
//! The live [`ParseState`] is owned by the [`ParseContext`](crate::ParseContext)
//! and mutated as input is consumed. Backtracking works by copy: a
//! [`Snapshot`] holds a copy of the state, and restoring it writes the copy
//! back.
//!
//! # Restore modes
//!
//! - **Consuming** ([`ParseContext::restore`](crate::ParseContext::restore)):
//!   the snapshot is used up. Every combinator restores this way after a
//!   failed attempt.
//! - **Non-consuming** ([`ParseContext::restore_clone`](crate::ParseContext::restore_clone)):
//!   the snapshot stays valid. The rule engine uses this to hand the same
//!   left-recursion seed to every re-entrant call.
//!
//! Restoring a consumed snapshot again, in either mode, fails with
//! [`Failure::InvalidSnapshotReuse`](crate::Failure::InvalidSnapshotReuse).

use std::fmt;

use crate::error::{Failure, PResult};

/// Position of the parser plus the ambient precedence level.
///
/// - `index`: byte offset into the input, always on a `char` boundary
/// - `min_precedence`: lowest precedence level a
///   [`precedence`](crate::ParseContext::precedence) term may have here
///
/// Both fields are part of the memoization key: the same rule at the same
/// index can match differently under a different precedence level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParseState {
    pub index: usize,
    pub min_precedence: i32,
}

impl ParseState {
    #[inline]
    pub const fn new(index: usize, min_precedence: i32) -> Self {
        ParseState {
            index,
            min_precedence,
        }
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.index, self.min_precedence)
    }
}

/// A saved copy of the parse state, usable once for a consuming restore.
///
/// Not `Clone`: each saved state is consumed at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    state: Option<ParseState>,
}

impl Snapshot {
    #[inline]
    pub(crate) fn new(state: ParseState) -> Self {
        Snapshot { state: Some(state) }
    }

    /// The saved state, or `None` once the snapshot was consumed.
    #[inline]
    pub fn state(&self) -> Option<ParseState> {
        self.state
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.state.is_none()
    }

    /// Use up the snapshot and return the saved state.
    #[inline]
    pub(crate) fn take(&mut self) -> PResult<ParseState> {
        self.state.take().ok_or(Failure::InvalidSnapshotReuse)
    }

    /// Read the saved state without consuming the snapshot.
    #[inline]
    pub(crate) fn peek(&self) -> PResult<ParseState> {
        self.state.ok_or(Failure::InvalidSnapshotReuse)
    }
}
