//! Stack growth for deep recursion
//!
//! Interpreted calls recurse on the native stack. Task threads and test
//! threads start with small stacks, so every call runs through
//! [`ensure_sufficient_stack`], which moves to a fresh segment when the
//! remaining space drops below the red zone.

/// Minimum remaining stack before a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if it is nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
