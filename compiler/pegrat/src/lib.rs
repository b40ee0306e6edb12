//! Packrat PEG parsing with left recursion and farthest-failure errors.
//!
//! Grammars are plain Rust functions over a [`ParseContext`]. A function
//! that should be memoized and may be left-recursive routes its body
//! through [`ParseContext::invoke`]; everything else calls the combinators
//! directly.
//!
//! ```
//! use pegrat::{first_of, ParseContext, PResult, Rule, RuleArgs};
//!
//! const EXPR: Rule = Rule::new("calc", "expr");
//!
//! // expr := expr '-' num | num
//! fn expr(ctx: &mut ParseContext<'_>) -> PResult<i64> {
//!     ctx.invoke(&EXPR, RuleArgs::new(), |ctx| {
//!         first_of!(ctx;
//!             |ctx| {
//!                 let left = expr(ctx)?;
//!                 ctx.str("-")?;
//!                 Ok(left - num(ctx)?)
//!             },
//!             num,
//!         )
//!     })
//! }
//!
//! fn num(ctx: &mut ParseContext<'_>) -> PResult<i64> {
//!     let digits = ctx.one_or_more_chars(|c| c.is_ascii_digit(), "digit")?;
//!     Ok(digits.parse().unwrap_or_default())
//! }
//!
//! let mut ctx = ParseContext::new("10-3-2");
//! let value = ctx.parse(|ctx| {
//!     let value = expr(ctx)?;
//!     ctx.eoi()?;
//!     Ok(value)
//! });
//! assert_eq!(value.ok(), Some(5));
//!
//! ctx.set_input("10-x");
//! let err = ctx.parse(|ctx| {
//!     let value = expr(ctx)?;
//!     ctx.eoi()?;
//!     Ok(value)
//! });
//! assert_eq!(
//!     err.map_err(|e| e.to_string()),
//!     Err("Error on line 1. Expected: digit instead of 'x'\n10-x\n   ^".to_owned())
//! );
//! ```
//!
//! # Modules
//!
//! - [`state`]: parse state and snapshots
//! - [`expect`]: expectation frames for error reporting
//! - [`rule`]: rule identity, arguments and invocation keys
//! - [`trace`]: engine events and trace sinks

mod combinator;
mod config;
mod context;
mod engine;
mod error;
pub mod expect;
mod memo;
pub mod rule;
mod stack;
pub mod state;
pub mod trace;

pub use config::ParserConfig;
pub use context::ParseContext;
pub use error::{Failure, PResult, ParseError};
pub use expect::{ExpectationFrame, ExpectationTracker};
pub use rule::{InvocationKey, Rule, RuleArg, RuleArgs, RuleId};
pub use state::{ParseState, Snapshot};
pub use trace::{
    EventLog, RecordedEvent, SinkError, TraceEvent, TraceEventKind, TraceSink, TracingSink,
    WriterSink,
};

pub use pegrat_diagnostic::{ErrorDescription, PositionInfo, Underline};

#[cfg(test)]
mod tests;
