//! Rule identity, rule arguments and invocation keys.
//!
//! A grammar declares each rule once as a [`Rule`] constant and routes
//! every call of the rule body through
//! [`ParseContext::invoke`](crate::ParseContext::invoke):
//!
//! ```
//! use pegrat::{ParseContext, PResult, Rule, RuleArgs};
//!
//! const NUMBER: Rule = Rule::new("calc", "number");
//!
//! fn number(ctx: &mut ParseContext<'_>) -> PResult<u64> {
//!     ctx.invoke(&NUMBER, RuleArgs::new(), |ctx| {
//!         let digits = ctx.one_or_more_chars(|c| c.is_ascii_digit(), "digit")?;
//!         Ok(digits.parse().unwrap_or(u64::MAX))
//!     })
//! }
//!
//! let mut ctx = ParseContext::new("42");
//! assert_eq!(number(&mut ctx), Ok(42));
//! ```
//!
//! Helpers that should not be memoized or take part in left-recursion
//! detection are plain functions that call combinators directly.

use std::fmt;

use smallvec::SmallVec;

use crate::state::ParseState;

/// Stable identifier of a grammar rule.
///
/// The grammar name keeps rules of several grammars sharing one context
/// apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId {
    grammar: &'static str,
    name: &'static str,
}

impl RuleId {
    pub const fn new(grammar: &'static str, name: &'static str) -> Self {
        RuleId { grammar, name }
    }

    #[inline]
    pub const fn grammar(self) -> &'static str {
        self.grammar
    }

    /// The rule (method) name, as reported to trace sinks.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.grammar, self.name)
    }
}

/// Declaration of a grammar rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    id: RuleId,
    memoize: bool,
}

impl Rule {
    /// A memoized rule.
    pub const fn new(grammar: &'static str, name: &'static str) -> Self {
        Rule {
            id: RuleId::new(grammar, name),
            memoize: true,
        }
    }

    /// Do not cache results of this rule.
    ///
    /// Left recursion is still detected and resolved. Use for rules whose
    /// arguments vary so much that caching them would only grow memory.
    #[must_use]
    pub const fn without_memo(self) -> Self {
        Rule {
            id: self.id,
            memoize: false,
        }
    }

    #[inline]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    #[inline]
    pub const fn memoize(&self) -> bool {
        self.memoize
    }
}

/// A single argument of a parameterized rule.
///
/// Arguments are part of the invocation key, so they need structural
/// equality and hashing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleArg {
    Int(i64),
    UInt(u64),
    Bool(bool),
    Char(char),
    Str(Box<str>),
}

impl RuleArg {
    /// Name of the argument type, as reported to trace sinks.
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleArg::Int(_) => "i64",
            RuleArg::UInt(_) => "u64",
            RuleArg::Bool(_) => "bool",
            RuleArg::Char(_) => "char",
            RuleArg::Str(_) => "str",
        }
    }
}

impl fmt::Display for RuleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleArg::Int(v) => write!(f, "{v}"),
            RuleArg::UInt(v) => write!(f, "{v}"),
            RuleArg::Bool(v) => write!(f, "{v}"),
            RuleArg::Char(v) => write!(f, "{v:?}"),
            RuleArg::Str(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! impl_from_for_rule_arg {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for RuleArg {
                fn from(value: $source) -> Self {
                    RuleArg::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_for_rule_arg!(Int as i64: i8, i16, i32, i64);
impl_from_for_rule_arg!(UInt as u64: u8, u16, u32, u64);
impl_from_for_rule_arg!(Bool as bool: bool);
impl_from_for_rule_arg!(Char as char: char);
impl_from_for_rule_arg!(Str as Box<str>: &str, String);

impl From<usize> for RuleArg {
    fn from(value: usize) -> Self {
        RuleArg::UInt(value as u64)
    }
}

/// Ordered arguments of one rule call. Most rules take none or one.
pub type RuleArgs = SmallVec<[RuleArg; 2]>;

/// Build [`RuleArgs`] from values convertible into [`RuleArg`].
///
/// ```
/// use pegrat::{rule_args, RuleArg};
///
/// let args = rule_args![3, "op", true];
/// assert_eq!(args[1], RuleArg::Str("op".into()));
/// assert!(rule_args![].is_empty());
/// ```
#[macro_export]
macro_rules! rule_args {
    () => {
        $crate::RuleArgs::new()
    };
    ($($arg:expr),+ $(,)?) => {{
        let mut args = $crate::RuleArgs::new();
        $(args.push($crate::RuleArg::from($arg));)+
        args
    }};
}

/// Identity of one rule activation: which rule, with which arguments,
/// starting from which state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvocationKey {
    pub rule: RuleId,
    pub args: RuleArgs,
    pub state: ParseState,
}

impl InvocationKey {
    pub fn new(rule: RuleId, args: RuleArgs, state: ParseState) -> Self {
        InvocationKey { rule, args, state }
    }
}

impl fmt::Display for InvocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.rule)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")@{}", self.state)
    }
}
