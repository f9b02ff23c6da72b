//! Input sanitizer: whitespace removal, alphabet and parenthesis-count checks.

use tracing::debug;

use crate::error::CalcError;

/// Characters a sanitized expression may contain.
pub const ALPHABET: &str = "0123456789+-*/().";

/// Whitespace as understood by the sanitizer: Unicode `White_Space` plus the
/// ASCII information separators (FS, GS, RS, US).
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Strip all whitespace from `raw` and validate what remains.
///
/// Whitespace is dropped wherever it occurs, so `"4 2"` becomes `"42"`.
/// The parenthesis check compares counts only; `")("` is accepted here and
/// left for the parser to reject.
pub fn sanitize(raw: &str) -> Result<String, CalcError> {
    let cleaned: String = raw.chars().filter(|&c| !is_separator(c)).collect();

    if let Some(found) = cleaned.chars().find(|c| !ALPHABET.contains(*c)) {
        debug!(%found, "rejecting expression with disallowed character");
        return Err(CalcError::InvalidCharacters { found });
    }

    let open = cleaned.matches('(').count();
    let close = cleaned.matches(')').count();
    if open != close {
        debug!(open, close, "rejecting expression with unbalanced parentheses");
        return Err(CalcError::UnbalancedParentheses { open, close });
    }

    Ok(cleaned)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
