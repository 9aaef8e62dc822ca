//! The evaluator: parses and executes script text in a single pass.
//!
//! There is no syntax tree. The evaluator walks the text with a
//! [`Scanner`], building values as it reads them and applying operators as
//! soon as both operands are known. Calling a script function starts a
//! nested evaluator over the function's stored source.
//!
//! # Grammar
//!
//! ```text
//! program    := statement*
//! statement  := ";" | expression ";"
//! expression := operand (call | operator expression)*
//! operand    := number | string | "#" "{" program "}" | list | object
//!             | "(" expression ")" | name | "-" expression
//! call       := "(" (expression ("," expression)*)? ")"
//! ```
//!
//! Operators have no precedence and chain to the right: everything after an
//! operator, up to the end of the enclosing expression, is its right operand.
//! `10 - 3 - 2` is `10 - (3 - 2)`.
//!
//! # Regions
//!
//! Bracketed spans (argument lists, literals, groups) are evaluated by a
//! child evaluator confined to the bracket's interior. Positions stay
//! absolute in the full text, so error locations are always correct.

use std::rc::Rc;

use flow_scan::chars::{is_digit, is_quote};
use flow_scan::{ScanError, Scanner};
use flow_stack::ensure_sufficient_stack;
use flow_value::{
    duplicated_operator, expected_terminator, missing_left_operand, not_callable, syntax_error,
    unexpected_char, EvalError, EvalResult, Function, FunctionKind, Location, Object, Payload,
    Value,
};

use crate::context::Context;
use crate::diagnostics::CallFrame;
use crate::operators::{apply_operator, BinaryOp};

/// Local holding a script call's result.
pub const RESULT_NAME: &str = "@ret";
/// Local holding a script call's arguments.
pub const ARGS_NAME: &str = "@args";

/// Backtrace name of a function called without a name.
const ANONYMOUS: &str = "<anonymous>";

/// Partially evaluated expression.
struct Pending<'src> {
    /// Left operand, and the result so far.
    left: Value,
    /// Variable name `left` was read from, for call diagnostics.
    name: Option<&'src str>,
    /// Operator waiting for its right operand.
    op: Option<BinaryOp>,
}

impl<'src> Pending<'src> {
    fn operand(left: Value, name: Option<&'src str>) -> Self {
        Pending {
            left,
            name,
            op: None,
        }
    }
}

/// Evaluator over one region of script text.
pub struct Evaluator<'src, 'ctx> {
    scanner: Scanner<'src>,
    /// End (exclusive) of the region this evaluator may read.
    end: usize,
    ctx: &'ctx mut Context,
    file: Option<Rc<str>>,
}

impl<'src, 'ctx> Evaluator<'src, 'ctx> {
    /// Evaluator over all of `text`.
    pub fn new(text: &'src str, ctx: &'ctx mut Context) -> Self {
        Self::with_file(text, ctx, None)
    }

    /// Evaluator over all of `text`, reporting error locations in `file`.
    pub fn with_file(text: &'src str, ctx: &'ctx mut Context, file: Option<Rc<str>>) -> Self {
        Evaluator {
            scanner: Scanner::new(text),
            end: text.len(),
            ctx,
            file,
        }
    }

    /// Child evaluator confined to `start..end`.
    fn region(&mut self, start: usize, end: usize) -> Evaluator<'src, '_> {
        let mut scanner = self.scanner;
        scanner.seek(start);
        Evaluator {
            scanner,
            end,
            ctx: &mut *self.ctx,
            file: self.file.clone(),
        }
    }

    /// Run every statement in the text.
    pub fn run(&mut self) -> EvalResult<()> {
        while self.statement()? {}
        Ok(())
    }

    /// Execute one statement. Returns `false` once the text is exhausted.
    pub fn statement(&mut self) -> EvalResult<bool> {
        self.scanner.skip_whitespace();
        if self.at_end() {
            return Ok(false);
        }
        if self.peek() == b';' {
            self.scanner.advance();
            return Ok(true);
        }
        let mut pending = None;
        self.expression(&mut pending, b';')?;
        if self.at_end() {
            tracing::info!("end of input without `;`");
            return Ok(false);
        }
        self.scanner.advance();
        Ok(true)
    }

    // Expressions

    /// Evaluate up to `terminator` (or the end of the region), which is left
    /// unconsumed. Returns `None` for an empty expression.
    fn expression(
        &mut self,
        pending: &mut Option<Pending<'src>>,
        terminator: u8,
    ) -> EvalResult<Option<Value>> {
        loop {
            self.scanner.skip_whitespace();
            let at = self.scanner.pos();
            if self.at_end() || self.peek() == terminator {
                return self.finish(pending.take(), at);
            }
            self.step(pending, terminator)
                .map_err(|err| err.at(self.location(at)))?;
        }
    }

    /// Close the expression. An operator still waiting for its right operand
    /// is applied to `undefined`.
    fn finish(&self, pending: Option<Pending<'src>>, at: usize) -> EvalResult<Option<Value>> {
        let Some(Pending { mut left, op, .. }) = pending else {
            tracing::warn!(at = %self.location(at), "empty expression");
            return Ok(None);
        };
        if let Some(op) = op {
            tracing::warn!(at = %self.location(at), %op, "operator without right operand");
            apply_operator(op, &mut left, Value::undefined())
                .map_err(|err| err.at(self.location(at)))?;
        }
        Ok(Some(left))
    }

    /// Consume one operand, operator or call.
    fn step(&mut self, pending: &mut Option<Pending<'src>>, terminator: u8) -> EvalResult<()> {
        let c = self.peek();
        if c == b'(' {
            if let Some(complete) = pending.as_mut().filter(|p| p.op.is_none()) {
                return self.call(complete);
            }
        }
        if let Some(op) = BinaryOp::from_byte(c) {
            return self.operator(pending, op);
        }
        self.operand(pending, terminator)
    }

    fn operator(&mut self, pending: &mut Option<Pending<'src>>, op: BinaryOp) -> EvalResult<()> {
        match pending {
            None if op == BinaryOp::Sub => {
                *pending = Some(Pending {
                    left: Value::number(0.0),
                    name: None,
                    op: Some(op),
                });
            }
            None => return Err(missing_left_operand(op.symbol())),
            Some(Pending { op: Some(_), .. }) => return Err(duplicated_operator(op.symbol())),
            Some(complete) => complete.op = Some(op),
        }
        self.scanner.advance();
        Ok(())
    }

    fn operand(&mut self, pending: &mut Option<Pending<'src>>, terminator: u8) -> EvalResult<()> {
        let Some(complete) = pending else {
            let (left, name) = ensure_sufficient_stack(|| self.value())?;
            *pending = Some(Pending::operand(left, name));
            return Ok(());
        };
        let Some(op) = complete.op else {
            return Err(expected_terminator(char::from(terminator)));
        };

        let mut right_pending = None;
        let right = ensure_sufficient_stack(|| self.expression(&mut right_pending, terminator))?
            .unwrap_or_default();
        apply_operator(op, &mut complete.left, right)?;
        if op != BinaryOp::Assign {
            complete.name = None;
        }
        complete.op = None;
        Ok(())
    }

    // Operands

    /// Read one operand. Names resolve to aliases of their variables.
    fn value(&mut self) -> EvalResult<(Value, Option<&'src str>)> {
        let c = self.peek();
        if is_digit(c) {
            let n = self
                .scanner
                .read_full_number()
                .map_err(|err| self.scan_error(err))?;
            return Ok((Value::number(n), None));
        }
        if is_quote(c) {
            let s = self
                .scanner
                .read_full_string()
                .map_err(|err| self.scan_error(err))?;
            return Ok((Value::string(s), None));
        }
        match c {
            b'#' => self.function_literal().map(|f| (f, None)),
            b'[' => self.list_literal().map(|l| (l, None)),
            b'{' => self.object_literal().map(|o| (o, None)),
            b'(' => self.group().map(|g| (g, None)),
            _ => {
                let at = self.scanner.pos();
                let word = self.scanner.read_full_word();
                if word.is_empty() {
                    let found = self.scanner.text()[at..].chars().next().unwrap_or('\0');
                    return Err(unexpected_char(found));
                }
                Ok((self.ctx.lookup(word)?, Some(word)))
            }
        }
    }

    /// `#{ ... }`: the raw body text becomes a script function.
    fn function_literal(&mut self) -> EvalResult<Value> {
        self.scanner.advance();
        self.scanner.skip_whitespace();
        if self.peek() != b'{' {
            return Err(syntax_error("expected `{` after `#`"));
        }
        let (start, end) = self.bracket()?;
        let body = &self.scanner.text()[start..end];
        Ok(Value::function(Function::script(body)))
    }

    /// `[a, b, ...]`
    fn list_literal(&mut self) -> EvalResult<Value> {
        let (start, end) = self.bracket()?;
        let items = self.region(start, end).list_items()?;
        Ok(Value::list(items.into_iter().map(Value::into_owned).collect()))
    }

    /// `{key: value, "quoted key": value, ...}`
    fn object_literal(&mut self) -> EvalResult<Value> {
        let (start, end) = self.bracket()?;
        let entries = self.region(start, end).object_entries()?;
        Ok(Value::object(entries))
    }

    /// `( expression )`
    fn group(&mut self) -> EvalResult<Value> {
        let (start, end) = self.bracket()?;
        let mut inner = self.region(start, end);
        let mut pending = None;
        let value = inner.expression(&mut pending, b';')?;
        inner.scanner.skip_whitespace();
        if !inner.at_end() {
            let at = inner.scanner.pos();
            return Err(expected_terminator(')').at(inner.location(at)));
        }
        value.ok_or_else(|| syntax_error("empty parentheses"))
    }

    /// Comma-separated expressions filling the whole region. Empty elements
    /// are skipped.
    fn list_items(&mut self) -> EvalResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.at_end() {
                return Ok(items);
            }
            let mut pending = None;
            if let Some(item) = self.expression(&mut pending, b',')? {
                items.push(item);
            }
            if !self.at_end() {
                self.scanner.advance();
            }
        }
    }

    /// `key: expression` entries filling the whole region. Empty entries are
    /// skipped; an empty value is `undefined`.
    fn object_entries(&mut self) -> EvalResult<Object> {
        let mut entries = Object::default();
        loop {
            self.scanner.skip_whitespace();
            if self.at_end() {
                return Ok(entries);
            }
            let at = self.scanner.pos();
            if self.peek() == b',' {
                tracing::warn!(at = %self.location(at), "empty object entry");
                self.scanner.advance();
                continue;
            }
            let key = self.object_key().map_err(|err| err.at(self.location(at)))?;

            self.scanner.skip_whitespace();
            if self.peek() != b':' {
                let at = self.scanner.pos();
                return Err(expected_terminator(':').at(self.location(at)));
            }
            self.scanner.advance();

            let mut pending = None;
            let value = self.expression(&mut pending, b',')?.unwrap_or_default();
            entries.insert(key.to_string(), value.into_owned());
            if !self.at_end() {
                self.scanner.advance();
            }
        }
    }

    fn object_key(&mut self) -> EvalResult<&'src str> {
        if is_quote(self.peek()) {
            return self
                .scanner
                .read_full_string()
                .map_err(|err| self.scan_error(err));
        }
        let key = self.scanner.read_full_word();
        if key.is_empty() {
            return Err(syntax_error("expected an object key"));
        }
        Ok(key)
    }

    // Calls

    /// `left(args...)`: invoke `left` and replace it with the result.
    fn call(&mut self, callee: &mut Pending<'src>) -> EvalResult<()> {
        let site = self.location(self.scanner.pos());
        let kind = callee.left.with(|payload| match payload {
            Payload::Function(function) => Some(function.kind().clone()),
            _ => None,
        });
        let Some(kind) = kind else {
            return Err(not_callable(callee.left.ty().name()));
        };

        let (start, end) = self.bracket()?;
        let args = self.region(start, end).list_items()?;
        let name = callee.name.unwrap_or(ANONYMOUS);
        let out = ensure_sufficient_stack(|| self.invoke(&kind, name, args, site))?;

        callee.left.with_mut(|payload| {
            if let Payload::Function(function) = payload {
                function.result_mut().store(out.copy());
            }
        });
        let mut out = out;
        callee.left.swap(&mut out);
        callee.name = None;
        Ok(())
    }

    fn invoke(
        &mut self,
        kind: &FunctionKind,
        name: &str,
        args: Vec<Value>,
        site: Location,
    ) -> EvalResult<Value> {
        match kind {
            FunctionKind::Native(native) => {
                tracing::debug!(name = native.name(), argc = args.len(), "native call");
                let mut out = Value::undefined();
                native.call(&args, &mut out)?;
                Ok(out.into_owned())
            }
            FunctionKind::Script(source) => self.call_script(name, source, args, site),
        }
    }

    /// Run a script body in a fresh frame and read its `@ret`.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    fn call_script(
        &mut self,
        name: &str,
        source: &Rc<str>,
        args: Vec<Value>,
        site: Location,
    ) -> EvalResult<Value> {
        self.ctx.push_frame(CallFrame {
            name: name.to_string(),
            location: site,
        })?;
        let result = bind_arguments(self.ctx, args)
            .and_then(|()| {
                let label: Rc<str> = Rc::from(format!("<fn {name}>"));
                Evaluator::with_file(source, &mut *self.ctx, Some(label)).run()
            })
            .map_err(|err| self.ctx.attach_backtrace(err));
        let locals = self.ctx.pop_frame();
        result?;
        Ok(locals
            .and_then(|locals| take_entry(locals, RESULT_NAME))
            .unwrap_or_default())
    }

    // Scanning helpers

    #[inline]
    fn at_end(&self) -> bool {
        self.scanner.pos() >= self.end
    }

    /// Byte at the cursor, or `0x00` at the end of the region.
    #[inline]
    fn peek(&self) -> u8 {
        if self.at_end() {
            0
        } else {
            self.scanner.current()
        }
    }

    /// Consume the bracket span at the cursor and return its interior.
    fn bracket(&mut self) -> EvalResult<(usize, usize)> {
        let open = self.scanner.pos();
        let close_end = self
            .scanner
            .bracket_end()
            .map_err(|err| self.scan_error(err))?;
        if close_end > self.end {
            let open_char = char::from(self.scanner.current());
            return Err(syntax_error(format!("missing closing bracket for `{open_char}`"))
                .at(self.location(open)));
        }
        self.scanner.seek(close_end);
        Ok((open + 1, close_end - 1))
    }

    fn location(&self, pos: usize) -> Location {
        let lc = self.scanner.line_col(pos);
        Location {
            file: self.file.as_deref().map(str::to_string),
            line: lc.line,
            col: lc.col,
        }
    }

    fn scan_error(&self, err: ScanError) -> EvalError {
        syntax_error(err.kind.to_string()).at(self.location(err.pos))
    }
}

/// Bind a call's arguments in the freshly pushed frame.
///
/// `@0`, `@1`, ... get one argument each. `@args` is the argument itself when
/// there is exactly one, otherwise a list of all of them. `@ret` starts out
/// `undefined`.
fn bind_arguments(ctx: &mut Context, mut args: Vec<Value>) -> EvalResult<()> {
    for (i, arg) in args.iter().enumerate() {
        ctx.define_local(&format!("@{i}"), arg.copy())?;
    }
    let bound = if args.len() == 1 {
        args.pop().unwrap_or_default()
    } else {
        Value::list(args.into_iter().map(Value::into_owned).collect())
    };
    ctx.define_local(ARGS_NAME, bound)?;
    ctx.define_local(RESULT_NAME, Value::undefined())
}

/// Remove `key` from an object value.
fn take_entry(mut object: Value, key: &str) -> Option<Value> {
    object.with_mut(|payload| match payload {
        Payload::Object(entries) => entries.remove(key),
        _ => None,
    })
}
