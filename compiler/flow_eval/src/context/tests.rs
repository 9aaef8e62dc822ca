use flow_value::{ErrorCategory, EvalErrorKind, Location};
use pretty_assertions::assert_eq;

use super::*;
use crate::print_handler::silent_handler;

fn context() -> Context {
    Context::builder().print_handler(silent_handler()).build()
}

fn call(name: &str) -> CallFrame {
    CallFrame {
        name: name.to_string(),
        location: Location {
            file: None,
            line: 1,
            col: 1,
        },
    }
}

#[test]
fn lookup_declares_missing_name_in_current_frame() {
    let mut ctx = context();
    let x = ctx.lookup("x").unwrap();
    assert!(x.is_alias());
    assert!(x.is_undefined());
    assert_eq!(ctx.local_names(), ["x"]);
    assert!(ctx.get("x").unwrap().is_undefined());
}

#[test]
fn lookup_alias_writes_through() {
    let mut ctx = context();
    ctx.lookup("x").unwrap().store(Value::number(5.0));
    assert_eq!(ctx.get("x").unwrap(), Value::number(5.0));
}

#[test]
fn lookup_prefers_local_over_global() {
    let mut ctx = context();
    ctx.define_global("v", Value::string("global")).unwrap();
    assert_eq!(ctx.lookup("v").unwrap(), Value::string("global"));
    ctx.define_local("v", Value::string("local")).unwrap();
    assert_eq!(ctx.lookup("v").unwrap(), Value::string("local"));
}

#[test]
fn assign_existing_requires_declaration() {
    let mut ctx = context();
    let err = ctx.assign_existing("y", Value::number(1.0)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::UndefinedSymbol { name: "y".into() });
    assert_eq!(err.category(), ErrorCategory::UndefinedSymbol);
    assert!(ctx.get("y").is_none());

    ctx.lookup("y").unwrap();
    ctx.assign_existing("y", Value::number(1.0)).unwrap();
    assert_eq!(ctx.get("y").unwrap(), Value::number(1.0));
}

#[test]
fn assign_existing_reaches_globals() {
    let mut ctx = context();
    ctx.define_global("g", Value::number(1.0)).unwrap();
    ctx.assign_existing("g", Value::number(2.0)).unwrap();
    assert_eq!(ctx.get("g").unwrap(), Value::number(2.0));
    assert!(!ctx.local_names().contains(&"g".to_string()));
}

#[test]
fn get_does_not_declare() {
    let ctx = context();
    assert!(ctx.get("nothing").is_none());
    assert!(ctx.local_names().is_empty());
}

#[test]
fn builtins_live_in_globals() {
    let ctx = context();
    assert!(ctx.get("print").is_some());
    assert!(ctx.get("exit").is_some());
    assert!(ctx.local_names().is_empty());
}

#[test]
fn reserved_names_alias_scopes() {
    let mut ctx = context();
    ctx.define_local("a", Value::number(1.0)).unwrap();
    let local = ctx.lookup(LOCAL_SCOPE).unwrap();
    assert_eq!(local.len(), Some(1));
    assert_eq!(local.get("a").unwrap(), Value::number(1.0));

    let global = ctx.lookup(GLOBAL_SCOPE).unwrap();
    assert!(global.get("print").is_some());
    assert!(ctx.local_names().iter().all(|n| n != LOCAL_SCOPE));
}

#[test]
fn replaced_scope_fails_lookup() {
    let mut ctx = context();
    ctx.lookup(LOCAL_SCOPE).unwrap().store(Value::number(1.0));
    let err = ctx.lookup("x").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::InvalidScope { scope: LOCAL_SCOPE });
    assert_eq!(err.category(), ErrorCategory::Type);
}

#[test]
fn frames_hide_caller_locals() {
    let mut ctx = context();
    ctx.define_local("outer", Value::number(1.0)).unwrap();
    ctx.push_frame(call("f")).unwrap();
    assert_eq!(ctx.depth(), 1);
    assert!(ctx.get("outer").is_none());
    assert!(ctx.get("print").is_some());
    ctx.define_local("inner", Value::number(2.0)).unwrap();

    let popped = ctx.pop_frame().unwrap();
    assert_eq!(popped.get("inner").unwrap(), Value::number(2.0));
    assert_eq!(ctx.depth(), 0);
    assert_eq!(ctx.local_names(), ["outer"]);
}

#[test]
fn bottom_frame_is_never_popped() {
    let mut ctx = context();
    ctx.define_local("a", Value::number(1.0)).unwrap();
    assert!(ctx.pop_frame().is_none());
    assert_eq!(ctx.local_names(), ["a"]);
}

#[test]
fn caller_alias_survives_call() {
    let mut ctx = context();
    let a = ctx.lookup("a").unwrap();
    ctx.push_frame(call("f")).unwrap();
    ctx.pop_frame();
    assert!(!a.is_dangling());
}

#[test]
fn push_frame_enforces_depth_limit() {
    let mut ctx = Context::builder()
        .print_handler(silent_handler())
        .max_call_depth(Some(2))
        .build();
    ctx.push_frame(call("a")).unwrap();
    ctx.push_frame(call("b")).unwrap();
    let err = ctx.push_frame(call("c")).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 2 });
    assert_eq!(ctx.depth(), 2);
}

#[test]
fn define_native_is_callable_from_globals() {
    let mut ctx = context();
    ctx.define_native("answer", |_, out| {
        out.store(Value::number(42.0));
        Ok(())
    })
    .unwrap();
    let answer = ctx.get("answer").unwrap();
    assert_eq!(answer.to_string(), "<native answer>");
}
