//! Interactive read-eval-print loop.
//!
//! Every line is executed as its own chunk against one long-lived context,
//! so variables persist across lines. Errors are reported and the session
//! continues; `exit(code)` ends it with that status.

use std::io::{self, BufRead, Write};

use flow_eval::execute;

use super::{report_error, RunOptions};

const PROMPT: &str = "flow> ";

pub fn repl(options: &RunOptions) {
    let mut ctx = options.context(Some("<repl>"));
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{PROMPT}");
        if io::stdout().flush().is_err() {
            break;
        }
        let Some(Ok(line)) = lines.next() else {
            break;
        };

        match line.trim() {
            "" => {}
            ":quit" | ":q" => break,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :quit, :q   Exit the REPL");
                println!("  :help, :h   Show this help");
                println!("  :vars       List local variables");
            }
            ":vars" => {
                for name in ctx.local_names() {
                    if let Some(value) = ctx.get(&name) {
                        println!("{name} = {value}");
                    }
                }
            }
            code => {
                if let Err(err) = execute(&mut ctx, code) {
                    if let Some(code) = err.exit_code() {
                        std::process::exit(code);
                    }
                    report_error(&err);
                }
            }
        }
    }
}
