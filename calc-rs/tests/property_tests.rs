use calc::error::{CalcError, EvalError};
use calc::sanitize::ALPHABET;
use calc::{calculate, evaluate, sanitize};
use proptest::prelude::*;

/// Arithmetic over small non-negative numbers, with an independently
/// computed value to compare against.
#[derive(Debug, Clone)]
enum Arith {
    Num(u8),
    /// Hundredths, written as a decimal literal.
    Dec(u16),
    Add(Box<Arith>, Box<Arith>),
    Sub(Box<Arith>, Box<Arith>),
    Mul(Box<Arith>, Box<Arith>),
    Div(Box<Arith>, Box<Arith>),
    FloorDiv(Box<Arith>, Box<Arith>),
    Pow(Box<Arith>, u8),
    Neg(Box<Arith>),
}

impl Arith {
    /// Fully parenthesised, with generous whitespace.
    fn render(&self) -> String {
        match self {
            Arith::Num(n) => n.to_string(),
            Arith::Dec(n) if *n < 100 => format!(".{n:02}"),
            Arith::Dec(n) => format!("{}.{:02}", n / 100, n % 100),
            Arith::Add(a, b) => format!("( {} + {} )", a.render(), b.render()),
            Arith::Sub(a, b) => format!("( {} - {} )", a.render(), b.render()),
            Arith::Mul(a, b) => format!("( {} * {} )", a.render(), b.render()),
            Arith::Div(a, b) => format!("( {} / {} )", a.render(), b.render()),
            Arith::FloorDiv(a, b) => format!("( {} // {} )", a.render(), b.render()),
            Arith::Pow(a, e) => format!("( {} ** {e} )", a.render()),
            Arith::Neg(a) => format!("( - {} )", a.render()),
        }
    }

    /// Expected value, computed with the same `f64` operations in the same
    /// order the evaluator uses.
    fn value(&self) -> Result<f64, NoValue> {
        let v = match self {
            Arith::Num(n) => f64::from(*n),
            Arith::Dec(_) => self.render().parse().map_err(|_| NoValue::OutOfRange)?,
            Arith::Add(a, b) => a.value()? + b.value()?,
            Arith::Sub(a, b) => a.value()? - b.value()?,
            Arith::Mul(a, b) => a.value()? * b.value()?,
            Arith::Div(a, b) => {
                let (a, b) = (a.value()?, b.value()?);
                if b == 0.0 {
                    return Err(NoValue::ZeroDivisor);
                }
                a / b
            }
            Arith::FloorDiv(..) => return Err(NoValue::Unmodelled),
            Arith::Pow(a, e) => a.value()?.powf(f64::from(*e)),
            Arith::Neg(a) => -a.value()?,
        };
        if v.is_finite() {
            Ok(v)
        } else {
            Err(NoValue::OutOfRange)
        }
    }
}

/// Why an expression has no reference value.
#[derive(Debug, PartialEq)]
enum NoValue {
    ZeroDivisor,
    OutOfRange,
    Unmodelled,
}

fn arith(with_floor_div: bool) -> BoxedStrategy<Arith> {
    let leaf = prop_oneof![
        (0u8..100).prop_map(Arith::Num),
        (0u16..10_000).prop_map(Arith::Dec),
    ];
    leaf.prop_recursive(5, 48, 2, move |inner| {
        let pair = (inner.clone(), inner.clone());
        let common = prop_oneof![
            2 => pair.clone().prop_map(|(a, b)| Arith::Add(Box::new(a), Box::new(b))),
            2 => pair.clone().prop_map(|(a, b)| Arith::Sub(Box::new(a), Box::new(b))),
            2 => pair.clone().prop_map(|(a, b)| Arith::Mul(Box::new(a), Box::new(b))),
            1 => pair.clone().prop_map(|(a, b)| Arith::Div(Box::new(a), Box::new(b))),
            1 => (inner.clone(), 0u8..3).prop_map(|(a, e)| Arith::Pow(Box::new(a), e)),
            1 => inner.prop_map(|a| Arith::Neg(Box::new(a))),
        ];
        if with_floor_div {
            prop_oneof![
                9 => common,
                1 => pair.prop_map(|(a, b)| Arith::FloorDiv(Box::new(a), Box::new(b))),
            ]
            .boxed()
        } else {
            common.boxed()
        }
    })
    .boxed()
}

proptest! {
    /// Valid arithmetic over numbers, whitespace and balanced parentheses
    /// evaluates to the expected value, unless it divides by zero.
    #[test]
    fn valid_arithmetic_evaluates(expr in arith(false)) {
        let src = expr.render();
        let want = expr.value();
        prop_assume!(want != Err(NoValue::OutOfRange));
        let got = calculate(&src);
        match want {
            Ok(want) => prop_assert_eq!(got, Ok(want), "{}", src),
            Err(_) => prop_assert_eq!(
                got,
                Err(CalcError::Evaluation(EvalError::DivisionByZero)),
                "{}",
                src
            ),
        }
    }
}

proptest! {
    /// With floor division in the mix, the only possible failures are a zero
    /// divisor or a power beyond the range of `f64`.
    #[test]
    fn valid_arithmetic_never_fails(expr in arith(true)) {
        let src = expr.render();
        match calculate(&src) {
            Ok(_) => {}
            Err(CalcError::Evaluation(
                EvalError::DivisionByZero | EvalError::FloorDivisionByZero | EvalError::Overflow,
            )) => {}
            Err(e) => prop_assert!(false, "unexpected {:?} for {}", e, src),
        }
    }
}

proptest! {
    /// Floor division and modulo agree: the quotient is integral and
    /// `q * b + r == a` up to rounding, with `r` taking the divisor's sign.
    #[test]
    fn floor_division_matches_modulo(a in 0u16..10_000, b in 1u16..10_000, neg in any::<bool>()) {
        let a = f64::from(a) / 100.0;
        let b = if neg { -f64::from(b) / 100.0 } else { f64::from(b) / 100.0 };
        let q = evaluate(&format!("{a}//({b})")).unwrap();
        let r = evaluate(&format!("{a}%({b})")).unwrap();
        prop_assert_eq!(q, q.trunc());
        prop_assert!((q * b + r - a).abs() <= 1e-9 * a.abs().max(1.0), "{} {} {} {}", a, b, q, r);
        prop_assert!(r == 0.0 || (r < 0.0) == (b < 0.0), "{} {} {}", a, b, r);
        prop_assert!(r.abs() <= b.abs());
    }
}

proptest! {
    /// Sanitizing a sanitized string changes nothing.
    #[test]
    fn sanitize_idempotent(s in "\\PC*") {
        if let Ok(once) = sanitize(&s) {
            prop_assert_eq!(sanitize(&once), Ok(once.clone()));
        }
    }
}

proptest! {
    /// Sanitizer output never contains whitespace or foreign characters and
    /// always has matching parenthesis counts.
    #[test]
    fn sanitize_output_invariants(s in "[0-9+*/().\\- \t]{0,40}") {
        match sanitize(&s) {
            Ok(out) => {
                prop_assert!(out.chars().all(|c| ALPHABET.contains(c)));
                prop_assert_eq!(out.matches('(').count(), out.matches(')').count());
            }
            Err(e) => prop_assert!(
                matches!(e, CalcError::UnbalancedParentheses { .. }),
                "unexpected {:?}", e
            ),
        }
    }
}

proptest! {
    /// The evaluator never panics on alphabet input; failures stay inside
    /// the evaluation error family.
    #[test]
    fn evaluate_total_on_alphabet(s in "[0-9+*/().\\-]{0,40}") {
        match evaluate(&s) {
            Ok(_) => {}
            Err(CalcError::Evaluation(_)) | Err(CalcError::InvalidStructure) => {}
            Err(e) => prop_assert!(false, "unexpected {:?} for {:?}", e, s),
        }
    }
}

proptest! {
    /// Arbitrary text either evaluates or fails with a typed error.
    #[test]
    fn evaluate_never_panics(s in "\\PC{0,60}") {
        let _ = evaluate(&s);
    }
}

proptest! {
    /// Division by zero is always reported, never turned into inf or nan.
    #[test]
    fn zero_divisor_reported(a in 0u32..10_000, op in prop::sample::select(vec!["/", "//", "%"])) {
        let src = format!("{a}{op}0");
        let err = evaluate(&src).unwrap_err();
        let expected = match op {
            "/" => EvalError::DivisionByZero,
            "//" => EvalError::FloorDivisionByZero,
            _ => EvalError::ModuloByZero,
        };
        prop_assert_eq!(err, CalcError::Evaluation(expected));
    }
}
