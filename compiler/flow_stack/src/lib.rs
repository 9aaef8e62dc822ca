//! Stack safety utilities for deep recursion.
//!
//! The Flow evaluator parses and executes in a single recursive pass, and a
//! script-function call spawns a nested evaluator on the same native stack.
//! Long right-associative operator chains and deep call chains therefore
//! recurse in proportion to the script, not to the interpreter.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).
//!
//! # Usage
//!
//! ```text
//! fn expression(&mut self, pending: &mut Option<Pending>) -> Result<(), EvalError> {
//!     ensure_sufficient_stack(|| {
//!         // ... recursive evaluation ...
//!     })
//! }
//! ```

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, additional stack
/// space is allocated before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
