//! Function values.
//!
//! A function is either a host callback or the raw source text of a script
//! body. Script bodies are never pre-parsed: the evaluator re-reads the text
//! on every call.

use std::fmt;
use std::rc::Rc;

use crate::errors::EvalResult;
use crate::value::Value;

/// Host callback signature.
///
/// Receives the evaluated argument list and the call's result slot. A
/// callback that leaves the slot untouched returns `undefined`.
pub type NativeCallback = dyn Fn(&[Value], &mut Value) -> EvalResult<()>;

/// A named host callback.
#[derive(Clone)]
pub struct NativeFn {
    name: Rc<str>,
    callback: Rc<NativeCallback>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<Rc<str>>,
        callback: impl Fn(&[Value], &mut Value) -> EvalResult<()> + 'static,
    ) -> Self {
        NativeFn {
            name: name.into(),
            callback: Rc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the callback.
    #[inline]
    pub fn call(&self, args: &[Value], out: &mut Value) -> EvalResult<()> {
        (self.callback)(args, out)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeFn").field(&self.name).finish()
    }
}

/// What a function runs when called.
#[derive(Clone, Debug)]
pub enum FunctionKind {
    Native(NativeFn),
    /// Raw body text, without the surrounding `#{` `}`.
    Script(Rc<str>),
}

/// A function value: its body plus the result slot of its latest call.
#[derive(Debug)]
pub struct Function {
    kind: FunctionKind,
    result: Value,
}

impl Function {
    pub fn native(
        name: impl Into<Rc<str>>,
        callback: impl Fn(&[Value], &mut Value) -> EvalResult<()> + 'static,
    ) -> Self {
        Function {
            kind: FunctionKind::Native(NativeFn::new(name, callback)),
            result: Value::undefined(),
        }
    }

    pub fn script(source: impl Into<Rc<str>>) -> Self {
        Function {
            kind: FunctionKind::Script(source.into()),
            result: Value::undefined(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    /// Body text of a script function.
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            FunctionKind::Script(source) => Some(source.as_ref()),
            FunctionKind::Native(_) => None,
        }
    }

    /// Result of the most recent call.
    #[inline]
    pub fn result(&self) -> &Value {
        &self.result
    }

    #[inline]
    pub fn result_mut(&mut self) -> &mut Value {
        &mut self.result
    }

    /// Deep copy, including the result slot.
    pub fn deep_copy(&self) -> Function {
        Function {
            kind: self.kind.clone(),
            result: self.result.copy(),
        }
    }
}

impl PartialEq for Function {
    /// Script functions compare by source text; natives by registered name.
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (FunctionKind::Script(a), FunctionKind::Script(b)) => a == b,
            (FunctionKind::Native(a), FunctionKind::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn script_equality_is_source_equality() {
        assert_eq!(Function::script("@ret = 1;"), Function::script("@ret = 1;"));
        assert_ne!(Function::script("@ret = 1;"), Function::script("@ret = 2;"));
    }

    #[test]
    fn native_equality_is_name_equality() {
        let a = Function::native("print", |_, _| Ok(()));
        let b = Function::native("print", |_, out| {
            out.store(Value::number(1.0));
            Ok(())
        });
        assert_eq!(a, b);
        assert_ne!(a, Function::native("exit", |_, _| Ok(())));
        assert_ne!(a, Function::script(""));
    }

    #[test]
    fn native_writes_result_slot() {
        let double = NativeFn::new("double", |args, out| {
            let n = args[0].as_number().unwrap_or(0.0);
            out.store(Value::number(n * 2.0));
            Ok(())
        });
        let mut out = Value::undefined();
        double.call(&[Value::number(21.0)], &mut out).unwrap();
        assert_eq!(out, Value::number(42.0));
    }

    #[test]
    fn deep_copy_keeps_kind_and_result() {
        let mut f = Function::script("@ret = 3;");
        f.result_mut().store(Value::number(3.0));
        let copy = f.deep_copy();
        assert_eq!(copy.source(), Some("@ret = 3;"));
        assert_eq!(copy.result(), &Value::number(3.0));
    }
}
