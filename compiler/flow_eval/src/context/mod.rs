//! Variable scopes for the evaluator.
//!
//! A `Context` holds one global object and a stack of local frames. Name
//! resolution is dynamic and two-level: the current frame, then globals.
//! Callers' frames are never searched.
//!
//! Scopes are ordinary object values, so script code can reach them through
//! the reserved names `__local__` and `__global__`, and can even replace them.
//! A scope that no longer holds an object fails every later lookup in it.

use flow_value::{
    invalid_scope, undefined_symbol, EvalError, EvalResult, Function, Object, Payload, Value,
};

use crate::config::{ContextBuilder, EvalConfig};
use crate::diagnostics::{CallFrame, CallStack};
use crate::print_handler::SharedPrintHandler;

/// Reserved name resolving to the current frame's object.
pub const LOCAL_SCOPE: &str = "__local__";
/// Reserved name resolving to the global object.
pub const GLOBAL_SCOPE: &str = "__global__";

/// Scope state shared by every evaluator running against it.
pub struct Context {
    globals: Value,
    /// Current frame's locals.
    local: Value,
    /// Suspended frames of the callers, innermost last.
    callers: Vec<Value>,
    call_stack: CallStack,
    print_handler: SharedPrintHandler,
    config: EvalConfig,
}

impl Context {
    /// A context with default settings, printing to stdout.
    pub fn new() -> Self {
        ContextBuilder::new().build()
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub(crate) fn from_parts(
        config: EvalConfig,
        call_stack: CallStack,
        print_handler: SharedPrintHandler,
    ) -> Self {
        Context {
            globals: Value::object(Object::default()),
            local: Value::object(Object::default()),
            callers: Vec::new(),
            call_stack,
            print_handler,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    // Name resolution

    /// Resolve `name` to an alias of its variable.
    ///
    /// Searches the current frame, then globals. A name found in neither is
    /// declared as `undefined` in the current frame.
    pub fn lookup(&mut self, name: &str) -> EvalResult<Value> {
        if let Some(found) = self.find(name)? {
            return Ok(found);
        }
        tracing::trace!(name, "declare local on first reference");
        entry_or_insert(&mut self.local, LOCAL_SCOPE, name)
    }

    /// Store `value` into an existing variable without declaring it.
    pub fn assign_existing(&mut self, name: &str, value: Value) -> EvalResult<()> {
        let mut target = self.find(name)?.ok_or_else(|| undefined_symbol(name))?;
        target.store(value.into_owned());
        Ok(())
    }

    /// Copy of the variable `name`, if it exists. Never declares.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.find(name).ok().flatten().map(|found| found.copy())
    }

    fn find(&self, name: &str) -> EvalResult<Option<Value>> {
        match name {
            LOCAL_SCOPE => return Ok(Some(self.local.alias())),
            GLOBAL_SCOPE => return Ok(Some(self.globals.alias())),
            _ => {}
        }
        if let Some(found) = entry(&self.local, LOCAL_SCOPE, name)? {
            return Ok(Some(found));
        }
        entry(&self.globals, GLOBAL_SCOPE, name)
    }

    // Definitions

    /// Bind `name` in the current frame, replacing any previous binding.
    pub fn define_local(&mut self, name: &str, value: Value) -> EvalResult<()> {
        define(&mut self.local, LOCAL_SCOPE, name, value)
    }

    /// Bind `name` in the global object, replacing any previous binding.
    pub fn define_global(&mut self, name: &str, value: Value) -> EvalResult<()> {
        define(&mut self.globals, GLOBAL_SCOPE, name, value)
    }

    /// Register a host function as the global `name`.
    pub fn define_native(
        &mut self,
        name: &str,
        callback: impl Fn(&[Value], &mut Value) -> EvalResult<()> + 'static,
    ) -> EvalResult<()> {
        self.define_global(name, Value::function(Function::native(name, callback)))
    }

    /// Names bound in the current frame, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names = self.local.with(|payload| match payload {
            Payload::Object(entries) => entries.keys().cloned().collect(),
            _ => Vec::new(),
        });
        names.sort();
        names
    }

    // Frames

    /// Enter a script call: record `call` and start an empty frame.
    pub fn push_frame(&mut self, call: CallFrame) -> EvalResult<()> {
        tracing::debug!(name = %call.name, depth = self.depth() + 1, "push frame");
        self.call_stack.push(call)?;
        let caller = std::mem::replace(&mut self.local, Value::object(Object::default()));
        self.callers.push(caller);
        Ok(())
    }

    /// Leave the current call and return its frame's locals.
    ///
    /// The bottom frame is never popped; popping it returns `None`.
    pub fn pop_frame(&mut self) -> Option<Value> {
        let caller = self.callers.pop()?;
        self.call_stack.pop();
        tracing::debug!(depth = self.depth(), "pop frame");
        Some(std::mem::replace(&mut self.local, caller))
    }

    /// Number of active script calls above the bottom frame.
    #[inline]
    pub fn depth(&self) -> usize {
        self.callers.len()
    }

    /// Decorate `err` with the current call chain.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        self.call_stack.attach_backtrace(err)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

fn entry(scope: &Value, scope_name: &'static str, name: &str) -> EvalResult<Option<Value>> {
    scope.with(|payload| match payload {
        Payload::Object(entries) => Ok(entries.get(name).map(Value::alias)),
        _ => Err(invalid_scope(scope_name)),
    })
}

fn entry_or_insert(scope: &mut Value, scope_name: &'static str, name: &str) -> EvalResult<Value> {
    scope.with_mut(|payload| match payload {
        Payload::Object(entries) => Ok(entries.entry(name.to_string()).or_default().alias()),
        _ => Err(invalid_scope(scope_name)),
    })
}

fn define(scope: &mut Value, scope_name: &'static str, name: &str, value: Value) -> EvalResult<()> {
    // copy before borrowing the scope: `value` may alias into it
    let value = value.into_owned();
    scope.with_mut(|payload| match payload {
        Payload::Object(entries) => {
            entries.insert(name.to_string(), value);
            Ok(())
        }
        _ => Err(invalid_scope(scope_name)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests;
