//! Failure signals and the final parse error.
//!
//! Inside a parse run every rule and combinator returns [`PResult`]. A
//! [`Failure`] is a control-flow signal, not a data carrier: what was
//! expected and where lives in the expectation tracker of the
//! [`ParseContext`](crate::ParseContext). Only when a failure escapes the
//! outermost rule is it turned into a [`ParseError`] carrying the rendered
//! farthest failure.

use pegrat_diagnostic::ErrorDescription;

use crate::rule::RuleId;

/// Why a rule or combinator did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The input at the current position does not match.
    #[error("no match")]
    NoMatch,

    /// A left-recursive rule was re-entered before any of its alternatives
    /// produced a seed. Behaves exactly like [`Failure::NoMatch`].
    #[error("left-recursive rule re-entered before a seed was established")]
    LeftRecursionWithoutSeed,

    /// A snapshot was restored after its consuming restore.
    #[error("snapshot restored after it was already consumed")]
    InvalidSnapshotReuse,

    /// A rule was invoked with a different value type than the one it
    /// previously stored for the same invocation key.
    #[error("rule `{rule}` was invoked with a different result type")]
    ValueTypeMismatch { rule: RuleId },
}

impl Failure {
    /// Returns `true` for failures that mean "this input does not match".
    ///
    /// Combinators backtrack on recoverable failures and propagate the
    /// others unchanged: those indicate a grammar or engine bug, not a
    /// mismatch.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Failure::NoMatch | Failure::LeftRecursionWithoutSeed)
    }
}

/// Result of a rule or combinator inside a parse run.
pub type PResult<T> = Result<T, Failure>;

/// Outcome of a whole parse run that did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input does not match the grammar. Describes the farthest failure.
    #[error("{0}")]
    Syntax(ErrorDescription),

    /// The engine was misused (snapshot reuse, inconsistent rule types).
    #[error("parser engine error: {0}")]
    Engine(Failure),
}

impl ParseError {
    /// The farthest-failure description, for syntax errors.
    pub fn description(&self) -> Option<&ErrorDescription> {
        match self {
            ParseError::Syntax(desc) => Some(desc),
            ParseError::Engine(_) => None,
        }
    }
}
