//! Error types for evaluation.
//!
//! `EvalErrorKind` gives every failure a typed category; the `#[cold]`
//! factory functions at the bottom of this module are the construction API
//! used by the scanner bridge, the operators, and the context.
//!
//! Errors are fatal to the script: the front end prints them and exits. The
//! library only ever returns them.

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Control signals that travel on the error path but are not failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlFlow {
    /// `exit(code)` was called; the host should terminate with `code`.
    Exit(i32),
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Syntax
    #[error("syntax error: {message}")]
    Syntax { message: String },

    // Type
    #[error("type error: operator `{op}` cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: char,
        left: &'static str,
        right: &'static str,
    },
    #[error("type error: {type_name} is not callable")]
    NotCallable { type_name: &'static str },
    #[error("type error: scope `{scope}` no longer holds an object")]
    InvalidScope { scope: &'static str },

    // Symbols
    #[error("undefined symbol: {name}")]
    UndefinedSymbol { name: String },

    // Arithmetic
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    // Calls
    #[error("maximum call depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },

    /// Catch-all for messages without a structured kind (including control
    /// signals, whose message describes the signal).
    #[error("{message}")]
    Custom { message: String },
}

/// Coarse grouping of error kinds, for hosts that only care about the class
/// of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntax,
    Type,
    UndefinedSymbol,
    Runtime,
    Exit,
}

/// Source position attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: Option<String>,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}:{}", self.line, self.col),
            None => write!(f, "{}:{}", self.line, self.col),
        }
    }
}

/// A single script-function call in an error backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    pub location: Option<Location>,
}

/// Snapshot of the script call stack at an error site, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(location) = &frame.location {
                write!(f, " at {location}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Where in the script text the error was raised.
    pub location: Option<Location>,
    /// Script call chain at the error site.
    pub backtrace: Option<EvalBacktrace>,
    /// Set when this "error" is a control signal such as `exit`.
    pub control_flow: Option<ControlFlow>,
}

impl EvalError {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom { message })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            location: None,
            backtrace: None,
            control_flow: None,
        }
    }

    /// Create the signal raised by the `exit` built-in.
    pub fn exit(code: i32) -> Self {
        let mut err = Self::new(format!("exit with code {code}"));
        err.control_flow = Some(ControlFlow::Exit(code));
        err
    }

    /// Attach a location unless one is already present.
    ///
    /// The innermost location wins: an error raised inside a function body
    /// keeps the body's position even after it unwinds through the call site.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }
        self
    }

    /// Attach a backtrace unless one is already present.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() && !backtrace.is_empty() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    #[inline]
    pub fn is_control_flow(&self) -> bool {
        self.control_flow.is_some()
    }

    /// Exit status requested by `exit`, if this is an exit signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self.control_flow {
            Some(ControlFlow::Exit(code)) => Some(code),
            None => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        if self.is_control_flow() {
            return ErrorCategory::Exit;
        }
        match self.kind {
            EvalErrorKind::Syntax { .. } => ErrorCategory::Syntax,
            EvalErrorKind::TypeMismatch { .. }
            | EvalErrorKind::NotCallable { .. }
            | EvalErrorKind::InvalidScope { .. } => ErrorCategory::Type,
            EvalErrorKind::UndefinedSymbol { .. } => ErrorCategory::UndefinedSymbol,
            EvalErrorKind::ModuloByZero
            | EvalErrorKind::IntegerOverflow { .. }
            | EvalErrorKind::RecursionLimit { .. }
            | EvalErrorKind::Custom { .. } => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(location) = &self.location {
            write!(f, " [{location}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Syntax Errors

#[cold]
pub fn syntax_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Syntax {
        message: message.into(),
    })
}

#[cold]
pub fn duplicated_operator(op: char) -> EvalError {
    syntax_error(format!("duplicated operator `{op}`"))
}

#[cold]
pub fn missing_left_operand(op: char) -> EvalError {
    syntax_error(format!("no left value in front of operator `{op}`"))
}

#[cold]
pub fn expected_terminator(terminator: char) -> EvalError {
    syntax_error(format!("expected `{terminator}`"))
}

#[cold]
pub fn unexpected_char(c: char) -> EvalError {
    syntax_error(format!("unexpected character `{c}`"))
}

// Type Errors

/// Operator applied to an unsupported combination of operand types.
#[cold]
pub fn binary_type_mismatch(op: char, left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch { op, left, right })
}

#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { type_name })
}

#[cold]
pub fn invalid_scope(scope: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidScope { scope })
}

// Symbol Errors

#[cold]
pub fn undefined_symbol(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedSymbol {
        name: name.to_string(),
    })
}

// Arithmetic Errors

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

// Call Errors

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}
