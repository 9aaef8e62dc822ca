#![allow(
    clippy::result_large_err,
    reason = "EvalError carries location and backtrace inline; every caller propagates it"
)]
//! Flow Eval - the Flow script interpreter.
//!
//! # Architecture
//!
//! - `Context`: global object plus a stack of local frames
//! - `Evaluator`: single-pass parse-and-execute over script text
//! - `apply_operator`: in-place binary operator dispatch
//! - `CallStack`: script call tracking for depth limits and backtraces
//! - `PrintHandlerImpl`: where the `print` built-in writes
//!
//! Value types are re-exported from `flow_value`.
//!
//! # Example
//!
//! ```
//! use flow_eval::{buffer_handler, execute, Context, Value};
//!
//! let output = buffer_handler();
//! let mut ctx = Context::builder().print_handler(output.clone()).build();
//! execute(&mut ctx, "a = 1; c = a + 3; print(a, c);").unwrap();
//! assert_eq!(output.get_output(), "1 4\n");
//! assert_eq!(ctx.get("c"), Some(Value::number(4.0)));
//! ```

mod builtins;
mod config;
mod context;
mod diagnostics;
mod operators;
mod print_handler;
mod runner;

use std::rc::Rc;

pub use flow_value::{
    ControlFlow, ErrorCategory, EvalError, EvalErrorKind, EvalResult, Function, FunctionKind,
    List, Location, NativeFn, Object, Payload, Value, ValueType,
};

pub use config::{ContextBuilder, EvalConfig, DEFAULT_MAX_CALL_DEPTH};
pub use context::{Context, GLOBAL_SCOPE, LOCAL_SCOPE};
pub use diagnostics::{CallFrame, CallStack};
pub use operators::{apply_operator, evaluate_binary, BinaryOp};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use runner::{Evaluator, ARGS_NAME, RESULT_NAME};

/// Run every statement of `text` against `context`.
///
/// Variables persist in `context` between calls, so a host can feed a
/// program one chunk at a time.
pub fn execute(context: &mut Context, text: &str) -> EvalResult<()> {
    let file = context.config().file_name.as_deref().map(Rc::from);
    Evaluator::with_file(text, context, file).run()
}
