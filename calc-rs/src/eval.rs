//! Safe evaluation: parse, whitelist-check, then reduce the tree to an `f64`.
//!
//! All arithmetic happens in `f64`. Integer literals are widened on the way
//! in, so `7//2` is `3.0` and `8/4` is `2.0`. Overflow in `+ - *` produces an
//! infinity like any IEEE operation; the operations that can fail are the
//! three divisions and exponentiation (see [`apply_binop`]).

use tracing::debug;

use crate::error::{CalcError, EvalError};
use crate::expr::{parse_expr, BinOp, Expr, UnaryOp};
use crate::safety::is_safe;

/// Parse `src`, reject any non-arithmetic construct, and compute its value.
///
/// Every failure after sanitization lands in the `Evaluation error` family:
/// syntax errors and arithmetic faults as [`CalcError::Evaluation`],
/// disallowed constructs as [`CalcError::InvalidStructure`].
pub fn evaluate(src: &str) -> Result<f64, CalcError> {
    let tree = parse_expr(src)?;
    if !is_safe(&tree) {
        debug!(src, "rejecting expression with non-arithmetic structure");
        return Err(CalcError::InvalidStructure);
    }
    let value = reduce(&tree)?;
    debug!(src, value, "evaluated expression");
    Ok(value)
}

/// Recursively reduce a tree to a number.
///
/// Callers are expected to have passed the tree through [`is_safe`]; anything
/// else is still refused here rather than evaluated.
pub fn reduce(expr: &Expr) -> Result<f64, CalcError> {
    match expr {
        Expr::Constant(c) => c.as_number().ok_or(CalcError::NonNumericResult),

        Expr::Unary(op, operand) => {
            let v = reduce(operand)?;
            match op {
                UnaryOp::Pos => Ok(v),
                UnaryOp::Neg => Ok(-v),
                UnaryOp::Invert | UnaryOp::Not => {
                    Err(EvalError::Unsupported("unary operator").into())
                }
            }
        }

        Expr::Binary(op, lhs, rhs) => {
            let a = reduce(lhs)?;
            let b = reduce(rhs)?;
            Ok(apply_binop(*op, a, b)?)
        }

        Expr::Name(_)
        | Expr::BoolOp(..)
        | Expr::Compare(..)
        | Expr::Call(..)
        | Expr::Attribute(..)
        | Expr::Subscript(..)
        | Expr::Tuple(_)
        | Expr::List(_) => Err(EvalError::Unsupported("expression element").into()),
    }
}

/// Apply one binary operator to two already-reduced operands.
pub fn apply_binop(op: BinOp, a: f64, b: f64) -> Result<f64, EvalError> {
    match op {
        BinOp::Add => Ok(a + b),
        BinOp::Sub => Ok(a - b),
        BinOp::Mul => Ok(a * b),
        BinOp::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(a / b)
        }
        BinOp::FloorDiv => floor_div(a, b),
        BinOp::Mod => modulo(a, b),
        BinOp::Pow => power(a, b),
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => {
            Err(EvalError::Unsupported("binary operator"))
        }
    }
}

/// Floored modulo: a non-zero result takes the sign of the divisor.
pub fn modulo(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::ModuloByZero);
    }
    let m = a % b;
    if m == 0.0 {
        return Ok(0.0_f64.copysign(b));
    }
    if (b < 0.0) != (m < 0.0) {
        Ok(m + b)
    } else {
        Ok(m)
    }
}

/// Floor division, consistent with [`modulo`] so that
/// `floor_div(a, b) * b + modulo(a, b) == a` up to rounding.
pub fn floor_div(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::FloorDivisionByZero);
    }
    let m = a % b;
    let mut div = (a - m) / b;
    if m != 0.0 && (b < 0.0) != (m < 0.0) {
        div -= 1.0;
    }
    if div == 0.0 {
        return Ok(0.0_f64.copysign(a / b));
    }
    let mut floored = div.floor();
    // (a - m) / b is exact in theory but may land just below an integer.
    if div - floored > 0.5 {
        floored += 1.0;
    }
    Ok(floored)
}

/// `a ** b` restricted to real results.
pub fn power(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Ok(1.0);
    }
    if a.is_nan() || b.is_nan() || a.is_infinite() || b.is_infinite() {
        return Ok(a.powf(b));
    }
    if a == 0.0 && b < 0.0 {
        return Err(EvalError::ZeroToNegativePower);
    }
    if a < 0.0 && b.fract() != 0.0 {
        return Err(EvalError::ComplexResult);
    }
    let r = a.powf(b);
    if r.is_infinite() {
        return Err(EvalError::Overflow);
    }
    Ok(r)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
