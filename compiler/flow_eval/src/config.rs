//! Evaluation settings and the `ContextBuilder`.

use crate::context::Context;
use crate::diagnostics::CallStack;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Default limit on nested script-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Settings that shape how a [`Context`] evaluates scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of nested script-function calls. `None` is unlimited.
    pub max_call_depth: Option<usize>,
    /// File name reported in error locations of top-level text.
    pub file_name: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            file_name: None,
        }
    }
}

/// Builder for [`Context`] instances.
///
/// Defaults: stdout printing, depth limit of [`DEFAULT_MAX_CALL_DEPTH`], no
/// file name.
#[derive(Default)]
pub struct ContextBuilder {
    config: EvalConfig,
    print_handler: Option<SharedPrintHandler>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the call depth limit. `None` disables the limit.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = Some(name.into());
        self
    }

    /// Set where `print` writes.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Build the context and install the built-ins into its globals.
    pub fn build(self) -> Context {
        let call_stack = CallStack::new(self.config.max_call_depth);
        let print_handler = self.print_handler.unwrap_or_else(stdout_handler);
        let mut context = Context::from_parts(self.config, call_stack, print_handler);
        crate::builtins::install(&mut context);
        context
    }
}
