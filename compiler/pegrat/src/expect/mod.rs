//! Farthest-failure expectation tracking.
//!
//! Every failing terminal registers what it expected (a literal, `"digit"`,
//! `"End Of Input"`, ...) together with the index where it looked. An
//! [`ExpectationFrame`] only remembers the expectations at the farthest
//! index seen so far, so after a failed parse it describes the deepest
//! point the grammar reached rather than the last alternative tried.
//!
//! Frames stack: `atomic` and `expect` run their term in a fresh frame and
//! replace whatever it collected with a single friendly label, and the rule
//! engine collects each rule's expectations in its own frame so they can be
//! stored alongside memoized results.

use std::mem;

/// Expectations registered at the farthest position seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpectationFrame {
    position: usize,
    /// Insertion ordered, no duplicates.
    expectations: Vec<String>,
}

impl ExpectationFrame {
    /// An empty frame at position 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty frame starting at `position`.
    pub fn at(position: usize) -> Self {
        ExpectationFrame {
            position,
            expectations: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn expectations(&self) -> &[String] {
        &self.expectations
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Record that `expectation` was expected at `position`.
    ///
    /// - farther right than the frame: the frame moves there and forgets
    ///   everything it held
    /// - at the frame position: the expectation is added (once)
    /// - to the left of the frame: ignored
    pub fn register(&mut self, position: usize, expectation: &str) {
        if position > self.position {
            self.position = position;
            self.expectations.clear();
        }
        if position == self.position && !self.contains(expectation) {
            self.expectations.push(expectation.to_owned());
        }
    }

    /// Fold `other` into this frame.
    ///
    /// The frame farther to the right wins outright. At equal positions the
    /// expectation lists are unioned, keeping first-seen order. An empty
    /// `other` changes nothing.
    pub fn merge(&mut self, other: ExpectationFrame) {
        if other.is_empty() {
            return;
        }
        if other.position > self.position {
            *self = other;
        } else if other.position == self.position {
            for expectation in other.expectations {
                if !self.contains(&expectation) {
                    self.expectations.push(expectation);
                }
            }
        }
    }

    fn contains(&self, expectation: &str) -> bool {
        self.expectations.iter().any(|e| e == expectation)
    }
}

/// Stack of expectation frames for one parse run.
///
/// Always holds at least the top-level frame.
#[derive(Clone, Debug)]
pub struct ExpectationTracker {
    frames: Vec<ExpectationFrame>,
}

impl Default for ExpectationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectationTracker {
    /// A tracker holding a single top-level frame at position 0.
    pub fn new() -> Self {
        ExpectationTracker {
            frames: vec![ExpectationFrame::new()],
        }
    }

    /// Drop all nested frames and start over with an empty top-level frame.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.push(ExpectationFrame::new());
    }

    /// The innermost frame.
    pub fn current(&self) -> &ExpectationFrame {
        // `frames` is never empty; the fallback only satisfies the type.
        self.frames.last().unwrap_or(&EMPTY_FRAME)
    }

    fn current_mut(&mut self) -> &mut ExpectationFrame {
        if self.frames.is_empty() {
            self.frames.push(ExpectationFrame::new());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Number of frames, including the top-level one.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Register an expectation with the innermost frame.
    pub fn register(&mut self, position: usize, expectation: &str) {
        self.current_mut().register(position, expectation);
    }

    /// Merge a detached frame into the innermost frame.
    pub fn merge(&mut self, frame: ExpectationFrame) {
        self.current_mut().merge(frame);
    }

    /// Start an isolated frame at `position`.
    pub fn push(&mut self, position: usize) {
        self.frames.push(ExpectationFrame::at(position));
    }

    /// Detach the innermost frame and return it.
    ///
    /// Popping the top-level frame hands it out and leaves a fresh one in
    /// its place.
    pub fn pop(&mut self) -> ExpectationFrame {
        if self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                return frame;
            }
        }
        mem::take(self.current_mut())
    }

    /// Detach the innermost frame, merge it into its parent and return a
    /// copy of what it held.
    pub fn pop_merge(&mut self) -> ExpectationFrame {
        let frame = self.pop();
        self.merge(frame.clone());
        frame
    }
}

static EMPTY_FRAME: ExpectationFrame = ExpectationFrame {
    position: 0,
    expectations: Vec::new(),
};
