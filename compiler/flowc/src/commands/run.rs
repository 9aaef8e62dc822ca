//! The `run` command: evaluate a script file.

use flow_eval::execute;

use super::{exit_on_error, read_file, RunOptions};

/// Run every statement of the file at `path`.
pub fn run_file(path: &str, options: &RunOptions) {
    let text = read_file(path);
    let mut ctx = options.context(Some(path));
    tracing::debug!(path, bytes = text.len(), "run file");
    if let Err(err) = execute(&mut ctx, &text) {
        exit_on_error(&err);
    }
}
