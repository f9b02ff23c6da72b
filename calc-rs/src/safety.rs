//! Structural whitelist applied to a parsed tree before it is evaluated.

use crate::expr::{BinOp, Expr, UnaryOp};

/// Return `true` if `expr` contains only numeric literals and the arithmetic
/// operators the evaluator implements, all the way down to every leaf.
///
/// Stops at the first disallowed node.
pub fn is_safe(expr: &Expr) -> bool {
    match expr {
        Expr::Constant(c) => c.as_number().is_some(),
        Expr::Unary(op, operand) => is_arithmetic_unary(*op) && is_safe(operand),
        Expr::Binary(op, lhs, rhs) => is_arithmetic_binary(*op) && is_safe(lhs) && is_safe(rhs),
        Expr::Name(_)
        | Expr::BoolOp(..)
        | Expr::Compare(..)
        | Expr::Call(..)
        | Expr::Attribute(..)
        | Expr::Subscript(..)
        | Expr::Tuple(_)
        | Expr::List(_) => false,
    }
}

fn is_arithmetic_unary(op: UnaryOp) -> bool {
    match op {
        UnaryOp::Pos | UnaryOp::Neg => true,
        UnaryOp::Invert | UnaryOp::Not => false,
    }
}

fn is_arithmetic_binary(op: BinOp) -> bool {
    match op {
        BinOp::Add
        | BinOp::Sub
        | BinOp::Mul
        | BinOp::Div
        | BinOp::FloorDiv
        | BinOp::Mod
        | BinOp::Pow => true,
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expr;

    fn safe(src: &str) -> bool {
        is_safe(&parse_expr(src).expect("parse failed"))
    }

    #[test]
    fn arithmetic_is_safe() {
        for src in ["1", "1.5", "-1", "+-1", "4+4", "(4+4)*2", "2**-1", "7//2", "7%2", "8/4"] {
            assert!(safe(src), "{src}");
        }
    }

    #[test]
    fn non_numeric_literals_are_unsafe() {
        for src in ["'a'", "True", "False", "None", "2j", "1+2j", "..."] {
            assert!(!safe(src), "{src}");
        }
    }

    #[test]
    fn non_arithmetic_nodes_are_unsafe() {
        for src in [
            "x",
            "abs(1)",
            "2(3)",
            "(1)(2)",
            "()",
            "(1,)",
            "[1]",
            "x.y",
            "x[0]",
            "1 < 2",
            "1 and 2",
            "not 1",
        ] {
            assert!(!safe(src), "{src}");
        }
    }

    #[test]
    fn non_arithmetic_operators_are_unsafe() {
        for src in ["~1", "1 & 2", "1 | 2", "1 ^ 2", "1 << 2", "1 >> 2"] {
            assert!(!safe(src), "{src}");
        }
    }

    #[test]
    fn unsafe_anywhere_rejects_whole_tree() {
        assert!(!safe("1 + 2 * (3 - x)"));
        assert!(!safe("-(1 + 'a')"));
        assert!(!safe("2 ** f(1)"));
    }
}
