//! Native stack growth for deeply nested grammars.
//!
//! Every rule activation is a few native frames deep, so a grammar nesting a
//! few thousand levels can exhaust the default thread stack. The engine runs
//! each activation through [`ensure_sufficient_stack`], which switches to a
//! freshly allocated segment once the remaining stack drops below the red
//! zone. On `wasm32` it calls the closure directly.

/// Grow when less than this remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
