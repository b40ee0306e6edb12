//! Packrat memoization cache.
//!
//! Maps an [`InvocationKey`] to the final outcome of that activation. Values
//! are stored type-erased; the engine downcasts them back to the rule's
//! value type on a hit. Entries live for one parse run and are dropped when
//! new input is bound.

use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::Failure;
use crate::expect::ExpectationFrame;
use crate::rule::InvocationKey;
use crate::state::ParseState;

/// Type-erased rule value, shared between the cache and seeds.
pub(crate) type ErasedValue = Rc<dyn Any>;

/// Final outcome of one rule activation.
#[derive(Debug)]
pub(crate) struct MemoEntry {
    pub outcome: Result<ErasedValue, Failure>,
    /// State to continue from on a hit. The start state for failures.
    pub state_after: ParseState,
    /// Expectations the activation produced, replayed on a hit.
    pub expectations: ExpectationFrame,
}

#[derive(Debug, Default)]
pub(crate) struct MemoCache {
    entries: FxHashMap<InvocationKey, MemoEntry>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &InvocationKey) -> Option<&MemoEntry> {
        self.entries.get(key)
    }

    /// Store an outcome. Fatal failures are never cached.
    pub fn insert(&mut self, key: InvocationKey, entry: MemoEntry) -> bool {
        if let Err(failure) = &entry.outcome {
            if !failure.is_recoverable() {
                return false;
            }
        }
        self.entries.insert(key, entry);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
