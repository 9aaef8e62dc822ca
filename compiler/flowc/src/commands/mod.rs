//! Command implementations for the `flow` binary.

mod eval;
mod repl;
mod run;

pub use eval::eval_code;
pub use repl::repl;
pub use run::run_file;

use flow_eval::{Context, EvalConfig, EvalError, DEFAULT_MAX_CALL_DEPTH};

/// Options shared by every command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Script call depth limit; `None` is unlimited.
    pub max_depth: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}

impl RunOptions {
    /// Apply one `--flag` argument. Returns `Err` with a message for an
    /// unknown or malformed flag.
    pub fn apply_flag(&mut self, arg: &str) -> Result<(), String> {
        if let Some(depth) = arg.strip_prefix("--max-depth=") {
            let depth: usize = depth
                .parse()
                .map_err(|_| format!("invalid value for --max-depth: '{depth}'"))?;
            // 0 lifts the limit
            self.max_depth = (depth > 0).then_some(depth);
            return Ok(());
        }
        Err(format!("unknown option '{arg}'"))
    }

    fn context(&self, file_name: Option<&str>) -> Context {
        Context::builder()
            .config(EvalConfig {
                max_call_depth: self.max_depth,
                file_name: file_name.map(str::to_string),
            })
            .build()
    }
}

/// Read a source file, exiting with a readable message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print an evaluation error to stderr.
pub(crate) fn report_error(err: &EvalError) {
    eprintln!("error: {err}");
    if let Some(backtrace) = &err.backtrace {
        eprint!("{backtrace}");
    }
}

/// End the process for a failed run: `exit(code)` exits with `code`, every
/// other error is reported and exits with status 1.
pub(crate) fn exit_on_error(err: &EvalError) -> ! {
    if let Some(code) = err.exit_code() {
        std::process::exit(code);
    }
    report_error(err);
    std::process::exit(1);
}
