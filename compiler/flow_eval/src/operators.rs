//! Binary operator implementations for the evaluator.
//!
//! Operators apply in place: `left op right` leaves its result in `left`.
//! Assignment writes through `left`; arithmetic swaps a fresh owned value
//! into `left`, so `a + 1` never writes to `a`.

use std::fmt;

use flow_value::{
    binary_type_mismatch, integer_overflow, modulo_by_zero, EvalResult, Payload, Value,
};

/// Operator characters recognised in operator position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'=' => Some(BinaryOp::Assign),
            b'+' => Some(BinaryOp::Add),
            b'-' => Some(BinaryOp::Sub),
            b'*' => Some(BinaryOp::Mul),
            b'/' => Some(BinaryOp::Div),
            b'%' => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Assign => '=',
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Mod => '%',
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Apply `op` to `left` and `right`, leaving the result in `left`.
pub fn apply_operator(op: BinaryOp, left: &mut Value, right: Value) -> EvalResult<()> {
    tracing::trace!(%op, left = ?left.ty(), right = ?right.ty(), "apply operator");
    if op == BinaryOp::Assign {
        left.store(right.into_owned());
        return Ok(());
    }
    let payload = left.with(|l| right.with(|r| evaluate_binary(op, l, r)))?;
    let mut result = Value::from_payload(payload);
    left.swap(&mut result);
    Ok(())
}

/// Evaluate an arithmetic operator over two payloads.
pub fn evaluate_binary(op: BinaryOp, left: &Payload, right: &Payload) -> EvalResult<Payload> {
    match (left, right) {
        (Payload::Number(a), Payload::Number(b)) => eval_number_binary(op, *a, *b),
        (Payload::Str(a), Payload::Str(b)) if op == BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Payload::Str(joined))
        }
        _ => Err(binary_type_mismatch(
            op.symbol(),
            left.ty().name(),
            right.ty().name(),
        )),
    }
}

fn eval_number_binary(op: BinaryOp, a: f64, b: f64) -> EvalResult<Payload> {
    let n = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => checked_mod(a, b)?,
        BinaryOp::Assign => {
            return Err(binary_type_mismatch(op.symbol(), "number", "number"));
        }
    };
    Ok(Payload::Number(n))
}

/// Integer remainder of both operands truncated toward zero.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "`%` is defined over truncated integers"
)]
fn checked_mod(a: f64, b: f64) -> EvalResult<f64> {
    let (a, b) = (a as i64, b as i64);
    if b == 0 {
        return Err(modulo_by_zero());
    }
    a.checked_rem(b)
        .map(|r| r as f64)
        .ok_or_else(|| integer_overflow("remainder"))
}
