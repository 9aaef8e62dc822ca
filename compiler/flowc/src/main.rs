//! Flow command-line interface.

use flowc::commands::{eval_code, repl, run_file, RunOptions};

fn main() {
    flowc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut options = RunOptions::default();
    let mut code: Option<&str> = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-e" => {
                let Some(text) = rest.next() else {
                    eprintln!("error: -e requires an argument");
                    std::process::exit(1);
                };
                code = Some(text.as_str());
            }
            flag if flag.starts_with("--") => {
                if let Err(msg) = options.apply_flag(flag) {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            }
            other => positional.push(other),
        }
    }

    match (code, positional.as_slice()) {
        (Some(code), []) => eval_code(code, &options),
        (None, [] | ["repl"]) => repl(&options),
        (None, ["run"]) => {
            eprintln!("Usage: flow run <file.flow>");
            std::process::exit(1);
        }
        (None, ["run", path] | [path]) => run_file(path, &options),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Flow scripting language");
    println!();
    println!("Usage:");
    println!("  flow                     Start the REPL");
    println!("  flow run <file.flow>     Run a script file");
    println!("  flow <file.flow>         Same as `flow run`");
    println!("  flow -e <code>           Run code given on the command line");
    println!();
    println!("Options:");
    println!("  --max-depth=<n>          Script call depth limit (0 = unlimited)");
    println!("  -h, --help               Show this help");
    println!();
    println!("Set FLOW_LOG (e.g. FLOW_LOG=flow_eval=debug) to enable tracing.");
}
