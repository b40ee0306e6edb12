//! Whole-grammar tests.
//!
//! - `arithmetic`: evaluating and rendering arithmetic grammars without
//!   left recursion
//! - `left_recursion`: direct and indirect left-recursive grammars
//! - `errors`: farthest-failure messages of complete parse runs
