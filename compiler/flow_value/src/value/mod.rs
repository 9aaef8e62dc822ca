//! Runtime values for the Flow interpreter.
//!
//! # Ownership Model
//!
//! Every [`Value`] either **owns** its payload cell or is an **alias** of a
//! cell owned by some other value:
//!
//! ```text
//! frame object ──owns──▶ "a": Value(owned) ──▶ [cell: Number(1)]
//!                                                  ▲
//! evaluator operand ─────── Value(alias) ──weak────┘
//! ```
//!
//! Variable lookup hands out aliases so that `a = 2` can write through to
//! the variable. Assignment stores a [`copy`](Value::copy) of the right-hand
//! side, so two variables never share a payload.
//!
//! Aliases never chain: aliasing an alias yields another alias of the same
//! cell, and storing an alias into an alias copies the payload.

mod display;
mod heap;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::function::Function;
use heap::{Slot, SlotRef};

/// Ordered sequence of values.
pub type List = Vec<Value>;

/// String-keyed map of values. Iteration order is unspecified.
pub type Object = FxHashMap<String, Value>;

/// The type tag of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Undefined,
    Number,
    String,
    List,
    Object,
    Function,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Undefined => "undefined",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Object => "object",
            ValueType::Function => "function",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The data a value cell holds.
#[derive(Debug, Default)]
pub enum Payload {
    #[default]
    Undefined,
    Number(f64),
    Str(String),
    List(List),
    Object(Object),
    Function(Function),
}

impl Payload {
    pub fn ty(&self) -> ValueType {
        match self {
            Payload::Undefined => ValueType::Undefined,
            Payload::Number(_) => ValueType::Number,
            Payload::Str(_) => ValueType::String,
            Payload::List(_) => ValueType::List,
            Payload::Object(_) => ValueType::Object,
            Payload::Function(_) => ValueType::Function,
        }
    }

    /// Recursively copy this payload. Nested values come out owning, even if
    /// they were aliases.
    pub fn deep_copy(&self) -> Payload {
        match self {
            Payload::Undefined => Payload::Undefined,
            Payload::Number(n) => Payload::Number(*n),
            Payload::Str(s) => Payload::Str(s.clone()),
            Payload::List(items) => Payload::List(items.iter().map(Value::copy).collect()),
            Payload::Object(entries) => Payload::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.copy()))
                    .collect(),
            ),
            Payload::Function(function) => Payload::Function(function.deep_copy()),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Undefined, Payload::Undefined) => true,
            (Payload::Number(a), Payload::Number(b)) => a == b,
            (Payload::Str(a), Payload::Str(b)) => a == b,
            (Payload::List(a), Payload::List(b)) => a == b,
            (Payload::Object(a), Payload::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(key, value)| b.get(key).is_some_and(|other| value == other))
            }
            (Payload::Function(a), Payload::Function(b)) => a == b,
            _ => false,
        }
    }
}

enum Repr {
    Owned(Slot),
    Alias(SlotRef),
}

/// Runtime value: an owned payload cell or an alias of another value's cell.
pub struct Value {
    repr: Repr,
}

// Construction

impl Value {
    /// Create an owning value around `payload`.
    #[inline]
    pub fn from_payload(payload: Payload) -> Self {
        Value {
            repr: Repr::Owned(Slot::new(payload)),
        }
    }

    #[inline]
    pub fn undefined() -> Self {
        Self::from_payload(Payload::Undefined)
    }

    #[inline]
    pub fn number(n: f64) -> Self {
        Self::from_payload(Payload::Number(n))
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Self::from_payload(Payload::Str(s.into()))
    }

    #[inline]
    pub fn list(items: List) -> Self {
        Self::from_payload(Payload::List(items))
    }

    #[inline]
    pub fn object(entries: Object) -> Self {
        Self::from_payload(Payload::Object(entries))
    }

    #[inline]
    pub fn function(function: Function) -> Self {
        Self::from_payload(Payload::Function(function))
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::undefined()
    }
}

// Ownership operations

impl Value {
    /// Returns `true` if this value aliases another value's payload.
    #[inline]
    pub fn is_alias(&self) -> bool {
        matches!(self.repr, Repr::Alias(_))
    }

    /// Returns `true` if this alias outlived the value it points at.
    pub fn is_dangling(&self) -> bool {
        match &self.repr {
            Repr::Owned(_) => false,
            Repr::Alias(target) => target.upgrade().is_none(),
        }
    }

    /// Returns `true` if `self` and `other` resolve to the same payload cell.
    pub fn same_target(&self, other: &Value) -> bool {
        self.target().ptr_eq(&other.target())
    }

    fn target(&self) -> SlotRef {
        match &self.repr {
            Repr::Owned(slot) => slot.downgrade(),
            Repr::Alias(target) => target.clone(),
        }
    }

    /// The `ref` operation: a new alias of this value's payload.
    ///
    /// Aliasing an alias points at the same target, never at the alias.
    #[inline]
    pub fn alias(&self) -> Value {
        Value {
            repr: Repr::Alias(self.target()),
        }
    }

    /// A fully owned, recursively deep copy.
    pub fn copy(&self) -> Value {
        Value::from_payload(self.with(Payload::deep_copy))
    }

    /// Convert to an owning value, copying only if `self` is an alias.
    pub fn into_owned(self) -> Value {
        match self.repr {
            Repr::Owned(_) => self,
            Repr::Alias(_) => self.copy(),
        }
    }

    /// Move the payload out. Owned cells are left `Undefined`; aliases yield
    /// a deep copy of their target so no payload ends up with two owners.
    pub fn into_payload(self) -> Payload {
        match &self.repr {
            Repr::Owned(slot) => std::mem::take(&mut *slot.borrow_mut()),
            Repr::Alias(_) => self.with(Payload::deep_copy),
        }
    }

    /// Store `other` into this value.
    ///
    /// - Alias: the write goes to the aliased cell, and every alias of that
    ///   cell (this one included) observes the new payload.
    /// - Owner: the old payload is released. An owned `other` has its
    ///   payload moved into this cell; an aliasing `other` turns this value
    ///   into that alias.
    ///
    /// Storing into a dangling alias turns it into an owner of the payload.
    pub fn store(&mut self, other: Value) {
        match &self.repr {
            Repr::Alias(target) => {
                if let Some(slot) = target.upgrade() {
                    let payload = other.into_payload();
                    *slot.borrow_mut() = payload;
                } else {
                    tracing::debug!("store through dangling alias");
                    *self = Value::from_payload(other.into_payload());
                }
            }
            Repr::Owned(slot) => match other.repr {
                Repr::Owned(_) => {
                    let payload = other.into_payload();
                    *slot.borrow_mut() = payload;
                }
                Repr::Alias(_) => *self = other,
            },
        }
    }

    /// Exchange payload, alias status and type with `other` without copying.
    #[inline]
    pub fn swap(&mut self, other: &mut Value) {
        std::mem::swap(&mut self.repr, &mut other.repr);
    }
}

// Payload access

impl Value {
    /// Run `f` on the resolved payload. A dangling alias reads as `Undefined`.
    pub fn with<R>(&self, f: impl FnOnce(&Payload) -> R) -> R {
        match &self.repr {
            Repr::Owned(slot) => f(&slot.borrow()),
            Repr::Alias(target) => match target.upgrade() {
                Some(slot) => with_slot(&slot, f),
                None => f(&Payload::Undefined),
            },
        }
    }

    /// Run `f` on the resolved payload, mutably. Through an alias this
    /// mutates the aliased variable; on a dangling alias the write is lost.
    pub fn with_mut<R>(&mut self, f: impl FnOnce(&mut Payload) -> R) -> R {
        match &self.repr {
            Repr::Owned(slot) => f(&mut slot.borrow_mut()),
            Repr::Alias(target) => match target.upgrade() {
                Some(slot) => with_slot_mut(&slot, f),
                None => f(&mut Payload::Undefined),
            },
        }
    }

    #[inline]
    pub fn ty(&self) -> ValueType {
        self.with(Payload::ty)
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.ty() == ValueType::Undefined
    }

    pub fn as_number(&self) -> Option<f64> {
        self.with(|payload| match payload {
            Payload::Number(n) => Some(*n),
            _ => None,
        })
    }

    pub fn as_string(&self) -> Option<String> {
        self.with(|payload| match payload {
            Payload::Str(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// Number of elements of a list or entries of an object.
    pub fn len(&self) -> Option<usize> {
        self.with(|payload| match payload {
            Payload::List(items) => Some(items.len()),
            Payload::Object(entries) => Some(entries.len()),
            _ => None,
        })
    }

    /// Deep copy of the entry `key` of an object value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with(|payload| match payload {
            Payload::Object(entries) => entries.get(key).map(Value::copy),
            _ => None,
        })
    }

    /// Deep copy of element `index` of a list value.
    pub fn at(&self, index: usize) -> Option<Value> {
        self.with(|payload| match payload {
            Payload::List(items) => items.get(index).map(Value::copy),
            _ => None,
        })
    }
}

fn with_slot<R>(slot: &Slot, f: impl FnOnce(&Payload) -> R) -> R {
    f(&slot.borrow())
}

fn with_slot_mut<R>(slot: &Slot, f: impl FnOnce(&mut Payload) -> R) -> R {
    f(&mut slot.borrow_mut())
}

impl PartialEq for Value {
    /// Deep equality. Type mismatch is always unequal.
    fn eq(&self, other: &Self) -> bool {
        self.with(|a| other.with(|b| a == b))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Owned(slot) => fmt::Debug::fmt(slot, f),
            Repr::Alias(target) => fmt::Debug::fmt(target, f),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::function(function)
    }
}
