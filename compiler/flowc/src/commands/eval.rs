//! The `-e` command: evaluate code given on the command line.

use flow_eval::execute;

use super::{exit_on_error, RunOptions};

pub fn eval_code(code: &str, options: &RunOptions) {
    let mut ctx = options.context(Some("<command line>"));
    if let Err(err) = execute(&mut ctx, code) {
        exit_on_error(&err);
    }
}
