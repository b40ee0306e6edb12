//! Parser configuration.

use pegrat_diagnostic::Underline;

/// Settings of a [`ParseContext`](crate::ParseContext).
///
/// ```
/// use pegrat::ParserConfig;
/// use pegrat_diagnostic::Underline;
///
/// let config = ParserConfig::new()
///     .memoize(false)
///     .underline(Underline::new('-', '|'));
/// assert!(!config.memoize_enabled());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    memoize: bool,
    underline: Underline,
    grow_stack: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            memoize: true,
            underline: Underline::default(),
            grow_stack: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache rule outcomes. Left recursion is resolved either way.
    #[must_use]
    pub fn memoize(mut self, enabled: bool) -> Self {
        self.memoize = enabled;
        self
    }

    /// Characters of the caret line in error messages.
    #[must_use]
    pub fn underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    /// Grow the native stack on demand around each rule activation.
    #[must_use]
    pub fn grow_stack(mut self, enabled: bool) -> Self {
        self.grow_stack = enabled;
        self
    }

    #[inline]
    pub fn memoize_enabled(&self) -> bool {
        self.memoize
    }

    #[inline]
    pub fn underline_chars(&self) -> Underline {
        self.underline
    }

    #[inline]
    pub fn grow_stack_enabled(&self) -> bool {
        self.grow_stack
    }
}
