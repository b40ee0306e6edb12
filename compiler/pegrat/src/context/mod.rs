//! The parse context: input, live state and per-run bookkeeping.
//!
//! A [`ParseContext`] is threaded through every rule and combinator as
//! `&mut ParseContext`. It owns
//!
//! - the input and the live [`ParseState`]
//! - the expectation tracker used for error reporting
//! - the memo cache and the map of active rule activations
//! - the registered trace sinks
//!
//! Rule invocation lives in the `engine` module and the combinators in
//! `combinator`; both are further `impl` blocks on this type.

use std::fmt::Debug;

use pegrat_diagnostic::{ErrorDescription, PositionInfo};
use rustc_hash::FxHashMap;

use crate::config::ParserConfig;
use crate::engine::ActiveInvocation;
use crate::error::{Failure, PResult, ParseError};
use crate::expect::{ExpectationFrame, ExpectationTracker};
use crate::memo::MemoCache;
use crate::rule::InvocationKey;
use crate::state::{ParseState, Snapshot};
use crate::trace::{TraceEvent, TraceEventKind, TraceSink};

/// State of one parser over one input.
///
/// Several grammars may share a context; rules are told apart by their
/// [`RuleId`](crate::RuleId). Not thread-safe.
pub struct ParseContext<'src> {
    input: &'src str,
    pub(crate) state: ParseState,
    pub(crate) config: ParserConfig,
    pub(crate) tracker: ExpectationTracker,
    pub(crate) memo: MemoCache,
    pub(crate) active: FxHashMap<InvocationKey, ActiveInvocation>,
    sinks: Vec<Box<dyn TraceSink>>,
}

impl<'src> ParseContext<'src> {
    pub fn new(input: &'src str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: &'src str, config: ParserConfig) -> Self {
        ParseContext {
            input,
            state: ParseState::default(),
            config,
            tracker: ExpectationTracker::new(),
            memo: MemoCache::new(),
            active: FxHashMap::default(),
            sinks: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    #[inline]
    pub fn input(&self) -> &'src str {
        self.input
    }

    /// Bind a new input and start a fresh parse run.
    ///
    /// Resets the state to index 0 and precedence 0, clears the memo cache
    /// and the active activations, resets the expectation tracker and
    /// notifies all sinks.
    pub fn set_input(&mut self, input: &'src str) {
        tracing::debug!(len = input.len(), "binding parser input");
        self.input = input;
        self.state = ParseState::default();
        self.memo.clear();
        self.active.clear();
        self.tracker.reset();
        for sink in &mut self.sinks {
            if let Err(err) = sink.input_bound(input) {
                tracing::warn!(error = %err, "trace sink failed on input change");
            }
        }
    }

    /// Register a trace sink. Sinks fire in registration order.
    ///
    /// The sink is told about the current input right away.
    pub fn add_sink(&mut self, mut sink: Box<dyn TraceSink>) {
        if let Err(err) = sink.input_bound(self.input) {
            tracing::warn!(error = %err, "trace sink failed on registration");
        }
        self.sinks.push(sink);
    }

    // Cursor

    /// Current byte offset into the input.
    #[inline]
    pub fn index(&self) -> usize {
        self.state.index
    }

    #[inline]
    pub fn state(&self) -> ParseState {
        self.state
    }

    #[inline]
    pub fn min_precedence(&self) -> i32 {
        self.state.min_precedence
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.state.index < self.input.len()
    }

    /// The unconsumed rest of the input.
    #[inline]
    pub fn rest(&self) -> &'src str {
        self.input.get(self.state.index..).unwrap_or("")
    }

    /// The next character, without consuming it.
    pub fn peek(&self) -> PResult<char> {
        self.rest().chars().next().ok_or(Failure::NoMatch)
    }

    /// Consume and return the next character.
    pub fn consume(&mut self) -> PResult<char> {
        let c = self.peek()?;
        self.state.index += c.len_utf8();
        Ok(c)
    }

    /// Advance over `len` bytes known to be present.
    #[inline]
    pub(crate) fn advance(&mut self, len: usize) {
        self.state.index = (self.state.index + len).min(self.input.len());
    }

    // Snapshots

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state)
    }

    /// Restore `snapshot` and consume it.
    pub fn restore(&mut self, snapshot: &mut Snapshot) -> PResult<()> {
        self.state = snapshot.take()?;
        Ok(())
    }

    /// Restore `snapshot` and keep it usable.
    pub fn restore_clone(&mut self, snapshot: &Snapshot) -> PResult<()> {
        self.state = snapshot.peek()?;
        Ok(())
    }

    /// Run `body` with the minimum precedence set to `level`.
    ///
    /// The previous level is back in place when `body` returns, whether
    /// it succeeded or not.
    pub fn with_precedence<T>(
        &mut self,
        level: i32,
        body: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let previous = self.state.min_precedence;
        self.state.min_precedence = level;
        let result = body(self);
        self.state.min_precedence = previous;
        result
    }

    // Expectations

    /// Register an unmet expectation at the current index.
    pub fn register_expectation(&mut self, label: &str) {
        self.register_expectation_at(self.state.index, label);
    }

    /// Register an unmet expectation at `index`.
    pub fn register_expectation_at(&mut self, index: usize, label: &str) {
        self.tracker.register(index, label);
        for sink in &mut self.sinks {
            if let Err(err) = sink.expectation_registered(index, label) {
                tracing::warn!(error = %err, "trace sink failed on expectation");
            }
        }
    }

    /// Register `label` at `index` and return the failure to propagate.
    #[inline]
    pub fn fail_at(&mut self, index: usize, label: &str) -> Failure {
        self.register_expectation_at(index, label);
        Failure::NoMatch
    }

    /// The innermost expectation frame.
    pub fn expectations(&self) -> &ExpectationFrame {
        self.tracker.current()
    }

    /// The farthest failure recorded so far, ready for display.
    pub fn error_description(&self) -> ErrorDescription {
        let frame = self.tracker.current();
        ErrorDescription::new(self.input, frame.position(), frame.expectations().iter().cloned())
            .with_underline(self.config.underline_chars())
    }

    /// Line, column and character at the current index.
    pub fn position_info(&self) -> PositionInfo {
        PositionInfo::new(self.input, self.state.index)
    }

    /// Number of memoized rule outcomes in this run.
    pub fn cache_len(&self) -> usize {
        self.memo.len()
    }

    /// Run `start` from the current state and turn a failure into a
    /// [`ParseError`].
    ///
    /// A mismatch yields [`ParseError::Syntax`] describing the farthest
    /// failure. The grammar decides whether the whole input must be
    /// consumed, typically by ending with [`eoi`](Self::eoi).
    pub fn parse<T>(&mut self, start: impl FnOnce(&mut Self) -> PResult<T>) -> Result<T, ParseError> {
        match start(self) {
            Ok(value) => Ok(value),
            Err(failure) if failure.is_recoverable() => {
                let description = self.error_description();
                tracing::debug!(
                    position = description.position(),
                    expected = description.expectations().len(),
                    "parse failed"
                );
                Err(ParseError::Syntax(description))
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "parser engine error");
                Err(ParseError::Engine(failure))
            }
        }
    }

    // Trace

    pub(crate) fn emit(
        &mut self,
        kind: TraceEventKind,
        key: &InvocationKey,
        result: Option<&dyn Debug>,
    ) {
        if self.sinks.is_empty() {
            return;
        }
        let event = TraceEvent {
            kind,
            rule: key.rule,
            args: &key.args,
            result,
            index: self.state.index,
        };
        for sink in &mut self.sinks {
            if let Err(err) = sink.on_event(&event) {
                tracing::warn!(rule = %key.rule, kind = kind.as_str(), error = %err, "trace sink failed");
            }
        }
    }
}

impl Debug for ParseContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseContext")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("cached", &self.memo.len())
            .field("active", &self.active.len())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}
