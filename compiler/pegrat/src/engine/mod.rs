//! Rule invocation: packrat memoization and left recursion.
//!
//! Every rule body runs through [`ParseContext::invoke`]. For one
//! activation, identified by an [`InvocationKey`], the engine
//!
//! 1. replays a memoized outcome if there is one
//! 2. detects re-entry of an activation that is still running (left
//!    recursion) and answers it with the current seed, or fails if no seed
//!    exists yet
//! 3. otherwise runs the body, growing the seed while the body keeps
//!    re-entering itself and consuming more input
//! 4. memoizes the final outcome
//!
//! # Seed growing
//!
//! For `expr := expr '+' num | num` on `1+2+3` the first run of `expr` at
//! index 0 re-enters itself, finds no seed and falls back to `num`, giving
//! the seed `1`. Because the run was recursive, the body runs again from
//! index 0; the re-entry now returns `1`, so the run yields `1+2`. The next
//! run yields `1+2+3`. The run after that consumes no more input than the
//! previous seed, so the seed `1+2+3` is final.
//!
//! # Taint
//!
//! While a seed is still growing, every activation between the recursive
//! head and its re-entry has seen a value that is not final. Those
//! activations are marked tainted and their outcome is not memoized, so a
//! later cache hit never replays a result built on an outdated seed.

use std::any::Any;
use std::fmt::Debug;
use std::rc::Rc;

use crate::context::ParseContext;
use crate::error::{Failure, PResult};
use crate::memo::{ErasedValue, MemoEntry};
use crate::rule::{InvocationKey, Rule, RuleArgs, RuleId};
use crate::stack::ensure_sufficient_stack;
use crate::state::Snapshot;
use crate::trace::TraceEventKind;

/// Best result so far of a left-recursive activation.
#[derive(Debug)]
pub(crate) struct Seed {
    pub value: ErasedValue,
    /// State right after the seed was produced.
    pub snapshot: Snapshot,
}

/// Bookkeeping for an activation that is on the call stack.
#[derive(Debug)]
pub(crate) struct ActiveInvocation {
    /// Re-entered during the current run of the body.
    pub recursive: bool,
    pub seed: Option<Seed>,
    /// Number of activations that were active when this one started.
    pub depth: usize,
    /// Observed a seed of an enclosing activation.
    pub tainted: bool,
}

impl ActiveInvocation {
    fn new(depth: usize) -> Self {
        ActiveInvocation {
            recursive: false,
            seed: None,
            depth,
            tainted: false,
        }
    }
}

fn downcast<T: Clone + 'static>(value: &dyn Any, rule: RuleId) -> PResult<T> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or(Failure::ValueTypeMismatch { rule })
}

impl ParseContext<'_> {
    /// Run `body` as an activation of `rule` with `args`.
    ///
    /// Memoizes the outcome (unless disabled for the rule or the context)
    /// and resolves direct and indirect left recursion. The same rule must
    /// always produce the same value type `T`; a mismatch is reported as
    /// [`Failure::ValueTypeMismatch`].
    ///
    /// ```
    /// use pegrat::{first_of, ParseContext, PResult, Rule, RuleArgs};
    ///
    /// const SUM: Rule = Rule::new("doc", "sum");
    ///
    /// // sum := sum '+' digit | digit
    /// fn sum(ctx: &mut ParseContext<'_>) -> PResult<u32> {
    ///     ctx.invoke(&SUM, RuleArgs::new(), |ctx| {
    ///         first_of!(ctx;
    ///             |ctx| {
    ///                 let left = sum(ctx)?;
    ///                 ctx.str("+")?;
    ///                 Ok(left + digit(ctx)?)
    ///             },
    ///             digit,
    ///         )
    ///     })
    /// }
    ///
    /// fn digit(ctx: &mut ParseContext<'_>) -> PResult<u32> {
    ///     let c = ctx.char_range('0', '9')?;
    ///     Ok(c.to_digit(10).unwrap_or(0))
    /// }
    ///
    /// let mut ctx = ParseContext::new("1+2+3");
    /// assert_eq!(sum(&mut ctx), Ok(6));
    /// assert_eq!(ctx.index(), 5);
    /// ```
    pub fn invoke<T, F>(&mut self, rule: &Rule, args: RuleArgs, mut body: F) -> PResult<T>
    where
        T: Clone + Debug + 'static,
        F: FnMut(&mut Self) -> PResult<T>,
    {
        if self.config.grow_stack_enabled() {
            ensure_sufficient_stack(|| self.invoke_inner(rule, args, &mut body))
        } else {
            self.invoke_inner(rule, args, &mut body)
        }
    }

    fn invoke_inner<T, F>(&mut self, rule: &Rule, args: RuleArgs, body: &mut F) -> PResult<T>
    where
        T: Clone + Debug + 'static,
        F: FnMut(&mut Self) -> PResult<T>,
    {
        let key = InvocationKey::new(rule.id(), args, self.state);
        let memoize = rule.memoize() && self.config.memoize_enabled();
        tracing::trace!(key = %key, "entering rule");
        self.emit(TraceEventKind::Entering, &key, None);

        if memoize {
            if let Some(outcome) = self.replay_cached::<T>(&key) {
                return self.finish(&key, outcome);
            }
        }

        if let Some(outcome) = self.reenter::<T>(&key) {
            return self.finish(&key, outcome);
        }

        let depth = self.active.len();
        self.active.insert(key.clone(), ActiveInvocation::new(depth));
        self.tracker.push(key.state.index);

        let outcome = self.grow(&key, body);

        let frame = self.tracker.pop_merge();
        let tainted = self.active.remove(&key).is_some_and(|a| a.tainted);
        if outcome.is_err() {
            self.state = key.state;
        }

        if memoize && !tainted {
            let entry = MemoEntry {
                outcome: match &outcome {
                    Ok(value) => Ok(Rc::new(value.clone()) as ErasedValue),
                    Err(failure) => Err(failure.clone()),
                },
                state_after: self.state,
                expectations: frame,
            };
            if self.memo.insert(key.clone(), entry) {
                self.emit(TraceEventKind::CachePut, &key, None);
            }
        } else if tainted {
            tracing::trace!(key = %key, "not memoizing tainted activation");
        }

        self.finish(&key, outcome)
    }

    /// Replay a memoized outcome for `key`, if any.
    fn replay_cached<T: Clone + 'static>(&mut self, key: &InvocationKey) -> Option<PResult<T>> {
        let hit = self.memo.get(key).map(|entry| {
            (
                entry.outcome.clone(),
                entry.state_after,
                entry.expectations.clone(),
            )
        });
        self.emit(TraceEventKind::CacheChecked { hit: hit.is_some() }, key, None);

        let (outcome, state_after, frame) = hit?;
        tracing::trace!(key = %key, "cache hit");
        self.state = state_after;
        self.tracker.merge(frame);
        Some(outcome.and_then(|value| downcast::<T>(&*value, key.rule)))
    }

    /// Handle a re-entry of an active activation.
    ///
    /// Returns `None` when `key` is not active.
    fn reenter<T: Clone + 'static>(&mut self, key: &InvocationKey) -> Option<PResult<T>> {
        let (depth, seed) = {
            let active = self.active.get_mut(key)?;
            active.recursive = true;
            let seed = active
                .seed
                .as_ref()
                .map(|seed| (Rc::clone(&seed.value), seed.snapshot.peek()));
            (active.depth, seed)
        };
        for inner in self.active.values_mut() {
            if inner.depth > depth {
                inner.tainted = true;
            }
        }
        tracing::trace!(key = %key, has_seed = seed.is_some(), "left recursion detected");
        self.emit(TraceEventKind::Recursive, key, None);

        Some(match seed {
            Some((value, state)) => state.and_then(|state| {
                self.state = state;
                downcast::<T>(&*value, key.rule)
            }),
            None => Err(Failure::LeftRecursionWithoutSeed),
        })
    }

    /// Run the body until its result is final.
    fn grow<T, F>(&mut self, key: &InvocationKey, body: &mut F) -> PResult<T>
    where
        T: Clone + Debug + 'static,
        F: FnMut(&mut Self) -> PResult<T>,
    {
        let start = self.snapshot();
        let mut progress = self.state.index;

        loop {
            let result = body(self);
            let (recursive, has_seed) = self
                .active
                .get(key)
                .map_or((false, false), |a| (a.recursive, a.seed.is_some()));

            let value = match result {
                Ok(value) => value,
                Err(failure) if failure.is_recoverable() && has_seed => {
                    return self.use_seed(key);
                }
                Err(failure) => return Err(failure),
            };

            if !recursive {
                return Ok(value);
            }
            if has_seed && self.state.index <= progress {
                return self.use_seed(key);
            }

            tracing::debug!(key = %key, grown_to = self.state.index, "seed grew");
            self.emit(TraceEventKind::Retrying, key, None);
            progress = self.state.index;
            let seed = Seed {
                value: Rc::new(value),
                snapshot: self.snapshot(),
            };
            if let Some(active) = self.active.get_mut(key) {
                active.recursive = false;
                active.seed = Some(seed);
            }
            self.restore_clone(&start)?;
        }
    }

    /// Finish with the current seed, restoring the state after it.
    fn use_seed<T: Clone + 'static>(&mut self, key: &InvocationKey) -> PResult<T> {
        let Some(mut seed) = self.active.get_mut(key).and_then(|a| a.seed.take()) else {
            return Err(Failure::LeftRecursionWithoutSeed);
        };
        self.restore(&mut seed.snapshot)?;
        downcast::<T>(&*seed.value, key.rule)
    }

    fn finish<T: Debug>(&mut self, key: &InvocationKey, outcome: PResult<T>) -> PResult<T> {
        match &outcome {
            Ok(value) => {
                tracing::trace!(key = %key, index = self.state.index, "leaving rule");
                self.emit(TraceEventKind::Leaving, key, Some(value));
            }
            Err(failure) => {
                tracing::trace!(key = %key, %failure, "rule failed");
                self.emit(TraceEventKind::Failed, key, None);
            }
        }
        outcome
    }
}
