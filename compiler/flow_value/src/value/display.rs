//! Display form of values, as written by `print`.
//!
//! Top-level strings print raw; strings nested inside lists and objects are
//! quoted so element boundaries stay readable. Object keys are sorted.

use std::fmt;

use super::{Payload, Value};
use crate::function::FunctionKind;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|payload| fmt::Display::fmt(payload, f))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Str(s) => f.write_str(s),
            other => write_payload(other, f),
        }
    }
}

/// Nested element: like `Display`, but strings are quoted.
struct Nested<'a>(&'a Value);

impl fmt::Display for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.with(|payload| write_payload(payload, f))
    }
}

fn write_payload(payload: &Payload, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match payload {
        Payload::Undefined => f.write_str("undefined"),
        Payload::Number(n) => write!(f, "{n}"),
        Payload::Str(s) => write!(f, "\"{s}\""),
        Payload::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", Nested(item))?;
            }
            f.write_str("]")
        }
        Payload::Object(entries) => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            f.write_str("{")?;
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "\"{key}\": {}", Nested(&entries[key]))?;
            }
            f.write_str("}")
        }
        Payload::Function(function) => match function.kind() {
            FunctionKind::Script(_) => f.write_str("<function>"),
            FunctionKind::Native(native) => write!(f, "<native {}>", native.name()),
        },
    }
}
