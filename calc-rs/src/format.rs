//! Rendering of evaluation results.

/// Format a result the way the calculator prints it.
///
/// Uses the shortest digit string that round-trips. Integral values keep a
/// trailing `.0`. Decimal exponents from -4 up to 15 print positionally;
/// anything outside that range switches to scientific notation with a signed,
/// at least two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }

    // `{:e}` yields the shortest round-trip digits as `d[.ddd]e[-]n`.
    let sci = format!("{x:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exp) {
        let plain = format!("{x}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
