//! Flow Scan - position-based cursor over raw Flow script text.
//!
//! The evaluator never builds a token stream. It asks the scanner where the
//! current token ends, slices the borrowed source, and moves the cursor on.
//! Every read returns a `&str` into the original text.
//!
//! # Token Shapes
//!
//! - words: `[A-Za-z0-9_@]+`
//! - numbers: digits with interspersed `.`
//! - strings: `'...'`, `"..."` or `` `...` ``, no escape decoding
//! - bracket spans: `(...)`, `[...]`, `{...}`, nesting-aware for the same
//!   bracket type and string-aware

pub mod chars;
mod scanner;

pub use scanner::{LineCol, ScanError, ScanErrorKind, Scanner};
