//! Built-in functions installed into every context's globals.
//!
//! - `print(args...)`: display forms joined by single spaces, then a newline
//! - `exit([code])`: stop the script with `code` (default `0`)

use std::sync::Arc;

use flow_value::{EvalError, EvalResult, Value, ValueType};

use crate::context::Context;
use crate::print_handler::SharedPrintHandler;

pub(crate) fn install(context: &mut Context) {
    let handler = Arc::clone(context.print_handler());
    let builtins: [(&str, Value); 2] = [
        (
            "print",
            native("print", move |args, _| print(&handler, args)),
        ),
        ("exit", native("exit", |args, _| exit(args))),
    ];
    for (name, function) in builtins {
        if let Err(err) = context.define_global(name, function) {
            tracing::warn!(name, %err, "built-in not installed");
        }
    }
}

fn native(
    name: &str,
    callback: impl Fn(&[Value], &mut Value) -> EvalResult<()> + 'static,
) -> Value {
    Value::function(flow_value::Function::native(name, callback))
}

fn print(handler: &SharedPrintHandler, args: &[Value]) -> EvalResult<()> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    handler.println(&line);
    Ok(())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "exit status is the code truncated to i32"
)]
fn exit(args: &[Value]) -> EvalResult<()> {
    let code = match args.first() {
        None => 0,
        Some(arg) => match arg.as_number() {
            Some(n) => n as i32,
            None if arg.ty() == ValueType::Undefined => 0,
            None => {
                return Err(EvalError::new(format!(
                    "exit code must be a number, got {}",
                    arg.ty()
                )))
            }
        },
    };
    tracing::debug!(code, "exit requested");
    Err(EvalError::exit(code))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use flow_value::ErrorCategory;

    use super::*;
    use crate::print_handler::buffer_handler;

    #[test]
    fn print_joins_with_spaces() {
        let handler = buffer_handler();
        print(
            &handler,
            &[Value::number(1.0), Value::string("two"), Value::undefined()],
        )
        .unwrap();
        assert_eq!(handler.get_output(), "1 two undefined\n");
    }

    #[test]
    fn print_without_arguments_prints_empty_line() {
        let handler = buffer_handler();
        print(&handler, &[]).unwrap();
        assert_eq!(handler.get_output(), "\n");
    }

    #[test]
    fn exit_defaults_to_zero() {
        let err = exit(&[]).unwrap_err();
        assert_eq!(err.exit_code(), Some(0));
        assert_eq!(err.category(), ErrorCategory::Exit);
    }

    #[test]
    fn exit_truncates_code() {
        assert_eq!(exit(&[Value::number(3.9)]).unwrap_err().exit_code(), Some(3));
    }

    #[test]
    fn exit_rejects_non_numbers() {
        let err = exit(&[Value::string("1")]).unwrap_err();
        assert!(!err.is_control_flow());
        assert_eq!(err.category(), ErrorCategory::Runtime);
    }
}
