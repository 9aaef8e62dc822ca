//! End-to-end tests of the `flow` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn flow(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flow"))
        .args(args)
        .env_remove("FLOW_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn flow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn script(name: &str, text: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::write(&path, text).expect("failed to write script");
    path
}

#[test]
fn eval_flag_prints() {
    let output = flow(&["-e", "a=1; c=a+3; print(a,c,a+c,d=c+3);"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1 4 5 7\n");
}

#[test]
fn run_file_prints() {
    let path = script(
        "run_file_prints.flow",
        "inc = #{ @ret = @args + 1; };\nprint(inc(41));\n",
    );
    let output = flow(&["run", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "42\n");
}

#[test]
fn bare_path_runs_file() {
    let path = script("bare_path_runs_file.flow", "print('ok');");
    let output = flow(&[path.to_str().unwrap()]);
    assert_eq!(stdout(&output), "ok\n");
}

#[test]
fn exit_sets_status() {
    let output = flow(&["-e", "print(1); exit(3); print(2);"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn errors_exit_with_status_one() {
    let output = flow(&["-e", "a = 'x' - 1;"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("error: type error:"), "stderr: {err}");
    assert!(err.contains("<command line>:1:"), "stderr: {err}");
}

#[test]
fn error_file_location() {
    let path = script("error_file_location.flow", "a = 1;\nb = a a;\n");
    let output = flow(&["run", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error_file_location.flow:2:"));
}

#[test]
fn missing_file_is_reported() {
    let output = flow(&["run", "definitely/not/here.flow"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot find file"));
}

#[test]
fn max_depth_flag_limits_recursion() {
    let output = flow(&[
        "--max-depth=10",
        "-e",
        "__global__ = {f: #{ f(); }}; f();",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("maximum call depth exceeded (limit: 10)"), "stderr: {err}");
    assert!(err.contains("stack backtrace:"), "stderr: {err}");
}

#[test]
fn unknown_flag_fails() {
    let output = flow(&["--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown option"));
}

#[test]
fn repl_reads_stdin_until_eof() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_flow"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn flow");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"a = 2;\nb = 'x' - 1;\nprint(a * 21);\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("42\n"));
    assert!(stderr(&output).contains("type error"));
}
