#![allow(
    clippy::result_large_err,
    reason = "EvalError carries location and backtrace inline; every caller propagates it"
)]
//! Flow Value - runtime values for the Flow interpreter.
//!
//! This crate provides:
//! - `Value`, the owned-or-aliased runtime value, and its `Payload`
//! - Function values (`Function`, `NativeFn`)
//! - Evaluation error types (`EvalError`, `EvalResult`) and their factories
//!
//! It knows nothing about script text; the evaluator lives in `flow_eval`.

mod errors;
mod function;
mod value;

pub use errors::{
    binary_type_mismatch, duplicated_operator, expected_terminator, integer_overflow,
    invalid_scope, missing_left_operand, modulo_by_zero, not_callable, recursion_limit_exceeded,
    syntax_error, undefined_symbol, unexpected_char, BacktraceFrame, ControlFlow, ErrorCategory,
    EvalBacktrace, EvalError, EvalErrorKind, EvalResult, Location,
};
pub use function::{Function, FunctionKind, NativeCallback, NativeFn};
pub use value::{List, Object, Payload, Value, ValueType};
