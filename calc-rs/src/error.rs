//! Error taxonomy shared by the sanitizer and the evaluator.

use thiserror::Error;

/// Failures surfaced by [`sanitize`](crate::sanitize::sanitize) and
/// [`evaluate`](crate::eval::evaluate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The sanitized text contains a character outside the calculator alphabet.
    #[error("Invalid characters in expression: {found:?}")]
    InvalidCharacters { found: char },

    /// `(` and `)` occur a different number of times.
    #[error("Unbalanced parentheses: {open} '(' vs {close} ')'")]
    UnbalancedParentheses { open: usize, close: usize },

    /// The parsed tree contains something other than numbers and arithmetic.
    #[error("Evaluation error: Invalid expression structure")]
    InvalidStructure,

    /// Parsing or reduction failed.
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    #[error("Evaluation error: Expression did not evaluate to a number")]
    NonNumericResult,
}

/// Cause of an evaluation-time failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("invalid syntax: {message} (at offset {offset})")]
    Syntax { message: String, offset: usize },

    #[error("float division by zero")]
    DivisionByZero,

    #[error("float modulo by zero")]
    ModuloByZero,

    #[error("float floor division by zero")]
    FloorDivisionByZero,

    #[error("0.0 cannot be raised to a negative power")]
    ZeroToNegativePower,

    /// A negative base with a fractional exponent has no real result.
    #[error("negative number cannot be raised to a fractional power")]
    ComplexResult,

    #[error("numerical result out of range")]
    Overflow,

    #[error("int too large to convert to float")]
    IntTooLarge,

    #[error("unsupported expression element: {0}")]
    Unsupported(&'static str),
}

impl EvalError {
    pub(crate) fn syntax(message: impl Into<String>, offset: usize) -> Self {
        EvalError::Syntax {
            message: message.into(),
            offset,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
