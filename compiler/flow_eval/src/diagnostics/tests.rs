use super::*;
use flow_value::EvalErrorKind;

fn frame(name: &str, line: u32) -> CallFrame {
    CallFrame {
        name: name.to_string(),
        location: Location {
            file: None,
            line,
            col: 1,
        },
    }
}

#[test]
fn push_and_pop() {
    let mut stack = CallStack::new(Some(10));
    assert!(stack.is_empty());
    stack.push(frame("f", 1)).expect("push within limit");
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.pop(), Some(frame("f", 1)));
    assert!(stack.is_empty());
}

#[test]
fn depth_limit_enforced() {
    let mut stack = CallStack::new(Some(2));
    stack.push(frame("a", 1)).expect("push within limit");
    stack.push(frame("b", 2)).expect("push within limit");
    let err = stack.push(frame("c", 3)).expect_err("push past limit");
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 2 });
    assert_eq!(stack.depth(), 2);
}

#[test]
fn unlimited_by_default() {
    let mut stack = CallStack::default();
    for i in 0..5000 {
        stack.push(frame("deep", i)).expect("unlimited");
    }
    assert_eq!(stack.depth(), 5000);
}

#[test]
fn capture_is_most_recent_first() {
    let mut stack = CallStack::new(None);
    stack.push(frame("outer", 1)).expect("push");
    stack.push(frame("inner", 7)).expect("push");
    let names: Vec<_> = stack
        .capture()
        .frames()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(names, ["inner", "outer"]);
}

#[test]
fn attach_backtrace_skips_empty_stack_and_exit() {
    let stack = CallStack::new(None);
    let err = stack.attach_backtrace(flow_value::syntax_error("x"));
    assert!(err.backtrace.is_none());

    let mut stack = CallStack::new(None);
    stack.push(frame("f", 1)).expect("push");
    assert!(stack.attach_backtrace(EvalError::exit(0)).backtrace.is_none());
    let err = stack.attach_backtrace(flow_value::syntax_error("x"));
    assert_eq!(err.backtrace.map(|b| b.len()), Some(1));
}
