//! Command-line front end for the calculator.
//!
//! Usage:
//!   calc [-v|--verbose] [-h|--help] [--] <expression-tokens...>
//!
//! Exit status: 0 on success, 1 on invalid input, 2 on unexpected failure.

use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use crate::error::{CalcError, EvalError};
use crate::eval::evaluate;
use crate::format::format_float;
use crate::sanitize::sanitize;

pub const USAGE: &str = "Usage: calc <expression>";

const HELP: &str = "\
Simple CLI calculator

Usage: calc [-v|--verbose] [-h|--help] [--] <expression>...

Arguments are joined with spaces and evaluated as one expression.
Supported: numbers, parentheses, + - * / and ** // %.

Options:
  -v, --verbose  Show parsed expression
  -h, --help     Show this help and exit";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    /// Print the sanitized expression before evaluating (`-v`).
    pub verbose: bool,
    /// Print help and exit (`-h`).
    pub help: bool,
    /// Expression tokens, in order.
    pub expression: Vec<String>,
}

impl CliArgs {
    /// The raw expression: all tokens joined with single spaces.
    pub fn expression(&self) -> String {
        self.expression.join(" ")
    }
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    UserError,
    Unexpected,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::UserError => 1,
            Exit::Unexpected => 2,
        }
    }
}

/// Failure while running one calculation from the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Calc(CalcError),

    /// A value outside the range of `f64`. Reported as unexpected rather than
    /// as an evaluation error.
    #[error(transparent)]
    OutOfRange(EvalError),

    /// Anything outside the calculator's own error taxonomy.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<CalcError> for CliError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::Evaluation(e @ (EvalError::Overflow | EvalError::IntTooLarge)) => {
                CliError::OutOfRange(e)
            }
            other => CliError::Calc(other),
        }
    }
}

impl CliError {
    pub fn exit(&self) -> Exit {
        match self {
            CliError::Calc(_) => Exit::UserError,
            CliError::OutOfRange(_) | CliError::Io(_) => Exit::Unexpected,
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Collect the process arguments minus the program name.
///
/// Arguments that are not valid UTF-8 are decoded lossily; the replacement
/// character then fails sanitization like any other foreign character.
pub fn args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

/// Parse a slice of argument strings.
///
/// Options are only recognised before the expression starts: the first token
/// that is not a known flag, and everything after it, is expression text.
/// That keeps `calc -5 + 3` working. Fails only when no expression is given.
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut i = 0;

    while i < argv.len() {
        match argv[i].as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => args.help = true,
            "--" => {
                i += 1;
                break;
            }
            _ => break,
        }
        i += 1;
    }
    args.expression.extend(argv[i..].iter().cloned());

    if args.expression.is_empty() && !args.help {
        return Err("no expression given".to_owned());
    }
    Ok(args)
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Sanitize, evaluate, and print one expression.
pub fn execute(args: &CliArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let sanitized = sanitize(&args.expression())?;
    if args.verbose {
        writeln!(out, "Parsed: {sanitized}")?;
    }
    let value = evaluate(&sanitized)?;
    writeln!(out, "Result: {}", format_float(value))?;
    Ok(())
}

/// User-facing message for a calculator failure.
pub fn user_message(err: &CalcError) -> String {
    match err {
        CalcError::InvalidCharacters { .. } => {
            "Error: Expression contains invalid characters.".to_owned()
        }
        CalcError::UnbalancedParentheses { .. } => {
            "Error: Unbalanced parentheses in expression.".to_owned()
        }
        other => format!("Error: {other}"),
    }
}

/// Run the calculator against `argv`, writing to the given streams.
///
/// Failures to write diagnostics to `err` are ignored; there is nowhere left
/// to report them.
pub fn run(argv: &[String], out: &mut dyn Write, err: &mut dyn Write) -> Exit {
    let args = match parse_argv(argv) {
        Ok(a) => a,
        Err(e) => {
            debug!(error = %e, "bad command line");
            let _ = writeln!(err, "{USAGE}");
            return Exit::UserError;
        }
    };

    if args.help {
        return match writeln!(out, "{HELP}") {
            Ok(()) => Exit::Success,
            Err(e) => {
                let _ = writeln!(err, "Unexpected error: {e}");
                Exit::Unexpected
            }
        };
    }

    match execute(&args, out) {
        Ok(()) => Exit::Success,
        Err(CliError::Calc(e)) => {
            debug!(error = %e, "calculation failed");
            let _ = writeln!(err, "{}", user_message(&e));
            Exit::UserError
        }
        Err(e) => {
            let _ = writeln!(err, "Unexpected error: {e}");
            e.exit()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
