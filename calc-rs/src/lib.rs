//! `calc`: a command-line arithmetic calculator.
//!
//! Input goes through two stages:
//!
//! - [`sanitize`] strips whitespace and checks the character set and the
//!   parenthesis counts.
//! - [`evaluate`] parses the result with a general expression grammar,
//!   refuses any tree that is not pure arithmetic ([`safety::is_safe`]), and
//!   reduces it to an `f64`.
//!
//! Both stages are pure and need no runtime; the `health` module (behind the
//! default `health` feature) is a separate liveness endpoint used only by the
//! `calc-health` binary.
//!
//! # Quick start
//!
//! ```rust
//! let cleaned = calc::sanitize("(4 + 4) * 2").unwrap();
//! assert_eq!(cleaned, "(4+4)*2");
//! assert_eq!(calc::evaluate(&cleaned).unwrap(), 16.0);
//! assert_eq!(calc::format_float(calc::calculate("7 / 2").unwrap()), "3.5");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
#[cfg(feature = "health")]
pub mod health;
pub mod logging;
pub mod safety;
pub mod sanitize;

// Re-exports for convenience.
pub use error::{CalcError, EvalError};
pub use eval::evaluate;
pub use format::format_float;
pub use sanitize::sanitize;

/// Sanitize `raw` and evaluate the result.
pub fn calculate(raw: &str) -> Result<f64, CalcError> {
    evaluate(&sanitize(raw)?)
}
