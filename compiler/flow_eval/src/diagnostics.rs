//! Call tracking for script-function calls.
//!
//! `CallStack` records where each active script call was made from. It
//! enforces the configured depth limit on push and snapshots itself into an
//! [`EvalBacktrace`] when an error leaves a call.

use flow_value::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError, Location};

/// A single active script call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    /// Name the callee was reached through, or `<anonymous>`.
    pub name: String,
    /// Call site.
    pub location: Location,
}

/// Live stack of script calls.
///
/// The depth check is part of `push()`: a push beyond `max_depth` fails and
/// leaves the stack unchanged.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        debug_assert!(!self.is_empty(), "CallStack::pop() called on empty stack");
        self.frames.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Snapshot the stack, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: f.name.clone(),
                location: Some(f.location.clone()),
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace of this stack to `err`, unless it already has one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.is_empty() || err.is_control_flow() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

impl Default for CallStack {
    /// Unlimited depth.
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests use expect for brevity")]
mod tests;
