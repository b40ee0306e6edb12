//! Combinators: choice, repetition, lookahead, error labels, precedence
//! and character-level matchers.
//!
//! All combinators are methods on [`ParseContext`] taking their terms as
//! closures `|ctx| -> PResult<T>`. They share one backtracking rule: a term
//! that fails with a recoverable [`Failure`] leaves no partial consumption
//! behind, the state is restored to where the attempt started. Fatal
//! failures pass through untouched.
//!
//! Character-level matchers register what they expected at the index
//! where the attempt started, so error messages point at the start of the
//! offending token.

use crate::context::ParseContext;
use crate::error::{Failure, PResult};

/// Ordered choice: try each alternative in turn and return the first
/// success.
///
/// Each alternative is anything accepted by
/// [`ParseContext::attempt`], usually a closure or a rule function. A
/// failing alternative is backtracked before the next one runs. When all
/// alternatives fail, the choice fails with [`Failure::NoMatch`];
/// the alternatives already registered what they expected.
///
/// ```
/// use pegrat::{first_of, ParseContext};
///
/// let mut ctx = ParseContext::new("-");
/// let sign = first_of!(&mut ctx;
///     |ctx| ctx.str("+").map(|_| 1),
///     |ctx| ctx.str("-").map(|_| -1),
/// );
/// assert_eq!(sign, Ok(-1));
/// ```
#[macro_export]
macro_rules! first_of {
    ($ctx:expr; $($alt:expr),+ $(,)?) => {{
        let ctx: &mut $crate::ParseContext<'_> = $ctx;
        'choice: {
            $(
                match ctx.attempt($alt) {
                    Err(failure) if failure.is_recoverable() => {}
                    outcome => break 'choice outcome,
                }
            )+
            Err($crate::Failure::NoMatch)
        }
    }};
}

impl<'src> ParseContext<'src> {
    /// Run `term`; on a recoverable failure restore the state it started
    /// from.
    pub fn attempt<T>(&mut self, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let mut snapshot = self.snapshot();
        match term(self) {
            Err(failure) if failure.is_recoverable() => {
                self.restore(&mut snapshot)?;
                Err(failure)
            }
            outcome => outcome,
        }
    }

    /// Ordered choice over a homogeneous list of alternatives.
    ///
    /// The iterator form of [`first_of!`](crate::first_of), for
    /// alternatives built at runtime.
    pub fn first_of_all<T, I, F>(&mut self, alternatives: I) -> PResult<T>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(&mut Self) -> PResult<T>,
    {
        for alternative in alternatives {
            match self.attempt(alternative) {
                Err(failure) if failure.is_recoverable() => {}
                outcome => return outcome,
            }
        }
        Err(Failure::NoMatch)
    }

    /// Match `term` as often as possible. Never fails on a mismatch.
    ///
    /// Stops after a match that consumed no input, so a term that can
    /// match the empty string does not loop forever.
    pub fn zero_or_more<T>(&mut self, mut term: impl FnMut(&mut Self) -> PResult<T>) -> PResult<Vec<T>> {
        let mut items = Vec::new();
        self.repeat_into(&mut items, &mut term)?;
        Ok(items)
    }

    /// Match `term` at least once, then as often as possible.
    pub fn one_or_more<T>(&mut self, mut term: impl FnMut(&mut Self) -> PResult<T>) -> PResult<Vec<T>> {
        let first = self.attempt(&mut term)?;
        let mut items = vec![first];
        self.repeat_into(&mut items, &mut term)?;
        Ok(items)
    }

    /// `term (separator term)*`, or nothing.
    ///
    /// A trailing separator is not consumed.
    pub fn zero_or_more_sep<T, S>(
        &mut self,
        term: impl FnMut(&mut Self) -> PResult<T>,
        separator: impl FnMut(&mut Self) -> PResult<S>,
    ) -> PResult<Vec<T>> {
        Ok(self
            .optional(|ctx| ctx.one_or_more_sep(term, separator))?
            .unwrap_or_default())
    }

    /// `term (separator term)*`.
    pub fn one_or_more_sep<T, S>(
        &mut self,
        mut term: impl FnMut(&mut Self) -> PResult<T>,
        mut separator: impl FnMut(&mut Self) -> PResult<S>,
    ) -> PResult<Vec<T>> {
        let first = self.attempt(&mut term)?;
        let mut items = vec![first];
        let mut next = |ctx: &mut Self| {
            separator(ctx)?;
            term(ctx)
        };
        self.repeat_into(&mut items, &mut next)?;
        Ok(items)
    }

    fn repeat_into<T>(
        &mut self,
        items: &mut Vec<T>,
        term: &mut impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<()> {
        loop {
            let before = self.state.index;
            match self.attempt(&mut *term) {
                Ok(item) => {
                    items.push(item);
                    if self.state.index == before {
                        return Ok(());
                    }
                }
                Err(failure) if failure.is_recoverable() => return Ok(()),
                Err(failure) => return Err(failure),
            }
        }
    }

    /// Match `term` if possible.
    pub fn optional<T>(&mut self, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        match self.attempt(term) {
            Ok(value) => Ok(Some(value)),
            Err(failure) if failure.is_recoverable() => Ok(None),
            Err(failure) => Err(failure),
        }
    }

    /// Negative lookahead: succeed without consuming input if `term` does
    /// not match here.
    ///
    /// If `term` matches, the state is restored, `label` is registered at
    /// the current index and the lookahead fails. Expectations registered
    /// by `term` itself are dropped.
    pub fn not<T>(&mut self, label: &str, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<()> {
        let mut snapshot = self.snapshot();
        self.tracker.push(self.state.index);
        let outcome = term(self);
        self.tracker.pop();
        self.restore(&mut snapshot)?;
        match outcome {
            Ok(_) => Err(self.fail_at(self.state.index, label)),
            Err(failure) if failure.is_recoverable() => Ok(()),
            Err(failure) => Err(failure),
        }
    }

    /// Positive lookahead: match `term` and return its value, but leave
    /// the position where it was.
    pub fn test<T>(&mut self, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let mut snapshot = self.snapshot();
        let outcome = term(self);
        if outcome.as_ref().is_err_and(|failure| !failure.is_recoverable()) {
            return outcome;
        }
        self.restore(&mut snapshot)?;
        outcome
    }

    /// Match `term` and report a failure as the single expectation `label`
    /// at the index where the attempt started.
    ///
    /// Expectations registered while matching `term` are dropped.
    pub fn atomic<T>(&mut self, label: &str, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let start = self.state.index;
        self.tracker.push(start);
        let outcome = self.attempt(term);
        self.tracker.pop();
        if outcome.as_ref().is_err_and(Failure::is_recoverable) {
            self.register_expectation_at(start, label);
        }
        outcome
    }

    /// Match `term` and report a failure as the single expectation `label`
    /// at the farthest index `term` reached.
    ///
    /// Expectations registered while matching `term` are dropped.
    pub fn expect<T>(&mut self, label: &str, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.tracker.push(self.state.index);
        let outcome = self.attempt(term);
        let frame = self.tracker.pop();
        if outcome.as_ref().is_err_and(Failure::is_recoverable) {
            self.register_expectation_at(frame.position(), label);
        }
        outcome
    }

    /// Match `term` as a term of precedence `level`.
    ///
    /// Fails if the ambient minimum precedence is above `level`. Otherwise
    /// runs `term` with the minimum raised (or lowered) to `level`, so
    /// nested precedence terms must bind at least as tightly.
    pub fn precedence<T>(&mut self, level: i32, term: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let min = self.state.min_precedence;
        if min > level {
            let label = format!("term of precedence above or equal {min}");
            return Err(self.fail_at(self.state.index, &label));
        }
        self.with_precedence(level, term)
    }

    // Literal matchers

    /// Match `expected` exactly.
    pub fn str(&mut self, expected: &str) -> PResult<&'src str> {
        let rest = self.rest();
        if rest.starts_with(expected) {
            let matched = &rest[..expected.len()];
            self.advance(expected.len());
            Ok(matched)
        } else {
            Err(self.fail_at(self.state.index, expected))
        }
    }

    /// Match one character satisfying `predicate`.
    pub fn char_matching(&mut self, predicate: impl FnOnce(char) -> bool, label: &str) -> PResult<char> {
        match self.peek().ok().filter(|&c| predicate(c)) {
            Some(c) => {
                self.advance(c.len_utf8());
                Ok(c)
            }
            None => Err(self.fail_at(self.state.index, label)),
        }
    }

    /// Match one character in `first..=last`.
    pub fn char_range(&mut self, first: char, last: char) -> PResult<char> {
        match self.peek() {
            Ok(c) if (first..=last).contains(&c) => {
                self.advance(c.len_utf8());
                Ok(c)
            }
            _ => {
                let label = format!("character between {first} and {last}");
                Err(self.fail_at(self.state.index, &label))
            }
        }
    }

    /// Match one character not contained in `chars`.
    pub fn none_of(&mut self, chars: &str) -> PResult<char> {
        match self.peek() {
            Ok(c) if !chars.contains(c) => {
                self.advance(c.len_utf8());
                Ok(c)
            }
            _ => {
                let label = format!("any char except {chars}");
                Err(self.fail_at(self.state.index, &label))
            }
        }
    }

    /// Match any one character.
    pub fn any_char(&mut self) -> PResult<char> {
        match self.consume() {
            Ok(c) => Ok(c),
            Err(_) => Err(self.fail_at(self.state.index, "any character")),
        }
    }

    /// Match the end of the input.
    pub fn eoi(&mut self) -> PResult<()> {
        if self.has_next() {
            Err(self.fail_at(self.state.index, "End Of Input"))
        } else {
            Ok(())
        }
    }

    /// Match the longest run of characters satisfying `predicate`, possibly
    /// empty.
    ///
    /// `label` is registered at the index where the run stopped, so an
    /// error right after the run lists it as a possible continuation.
    pub fn zero_or_more_chars(&mut self, mut predicate: impl FnMut(char) -> bool, label: &str) -> PResult<&'src str> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !predicate(c))
            .map_or(rest.len(), |(i, _)| i);
        self.advance(len);
        self.register_expectation(label);
        Ok(&rest[..len])
    }

    /// Like [`zero_or_more_chars`](Self::zero_or_more_chars), but fails on
    /// an empty run.
    pub fn one_or_more_chars(&mut self, predicate: impl FnMut(char) -> bool, label: &str) -> PResult<&'src str> {
        let matched = self.zero_or_more_chars(predicate, label)?;
        if matched.is_empty() {
            return Err(Failure::NoMatch);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests;
