//! End-to-end tests: run the `calc` binary and check exit status and streams.

use std::process::{Command, Output};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn calc_binary() -> std::path::PathBuf {
    // CARGO_BIN_EXE_calc is set by cargo test infrastructure.
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_calc"))
}

fn run_calc(args: &[&str]) -> Output {
    Command::new(calc_binary())
        .args(args)
        .env_remove("CALC_LOG")
        .output()
        .expect("failed to spawn calc binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ── Cases ─────────────────────────────────────────────────────────────────────

#[test]
fn no_arguments_prints_usage() {
    let out = run_calc(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Usage: calc <expression>"));
}

#[test]
fn separate_tokens() {
    let out = run_calc(&["4", "+", "4"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Result: 8.0\n");
}

#[test]
fn single_quoted_token() {
    let out = run_calc(&["4 + 4"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Result: 8.0\n");
}

#[test]
fn invalid_character() {
    let out = run_calc(&["4", "+", "a"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Error: Expression contains invalid characters."));
}

#[test]
fn unbalanced() {
    let out = run_calc(&["(4", "+", "4"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Error: Unbalanced parentheses in expression."));
}

#[test]
fn division_by_zero() {
    let out = run_calc(&["1/0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Error: Evaluation error: float division by zero"));
}

#[test]
fn trailing_operator() {
    let out = run_calc(&["4", "+"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Error: Evaluation error: invalid syntax"));
}

#[test]
fn verbose_shows_parsed() {
    let out = run_calc(&["--verbose", "(4 + 4) * 2"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Parsed: (4+4)*2\nResult: 16.0\n");
}

#[test]
fn power_and_floor_division() {
    let out = run_calc(&["2", "**", "10", "//", "3"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Result: 341.0\n");
}

#[test]
fn negative_leading_number() {
    let out = run_calc(&["-5", "+", "3"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Result: -2.0\n");
}

#[test]
fn logging_stays_off_stdout() {
    let out = Command::new(calc_binary())
        .args(["1", "+", "1"])
        .env("CALC_LOG", "debug")
        .output()
        .expect("failed to spawn calc binary");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "Result: 2.0\n");
}

#[test]
fn overflow_is_unexpected() {
    let out = run_calc(&["10.0**400"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).is_empty());
    assert_eq!(stderr(&out), "Unexpected error: numerical result out of range\n");
}

#[test]
fn integer_beyond_float_range_is_unexpected() {
    let digits = "9".repeat(400);
    let out = run_calc(&[digits.as_str()]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(stderr(&out), "Unexpected error: int too large to convert to float\n");
}

#[cfg(unix)]
#[test]
fn non_utf8_argument_is_invalid_characters() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let out = Command::new(calc_binary())
        .arg(OsStr::from_bytes(b"4+\xff"))
        .env_remove("CALC_LOG")
        .output()
        .expect("failed to spawn calc binary");
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert_eq!(stderr(&out), "Error: Expression contains invalid characters.\n");
}
