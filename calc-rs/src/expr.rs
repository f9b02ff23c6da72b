//! Expression lexer, AST, and parser.
//!
//! The grammar is a general-purpose expression grammar, not a calculator-only
//! one: it accepts names, calls, attribute access, subscripts, comparisons,
//! boolean operators, strings, tuples and lists alongside plain arithmetic.
//! Deciding which of those trees may be evaluated is the job of
//! [`crate::safety`].
//!
//! Operator precedence (lowest → highest):
//!   or  →  and  →  not  →  comparison  →  `|`  →  `^`  →  `&`  →
//!   shift  →  additive  →  multiplicative  →  unary  →  `**`  →
//!   postfix  →  atom
//!
//! `**` is right-associative and binds tighter than a unary operator on its
//! left (`-2**2 == -4`) but accepts one on its right (`2**-1`).

use std::fmt;

use crate::error::EvalError;

/// Deepest bracket nesting the lexer accepts.
pub const MAX_BRACKET_NESTING: usize = 100;

/// Deepest tree the parser will build, and the most recursive descents it
/// will make while building it. Either limit keeps parsing, checking and
/// evaluating within a default 2 MiB thread stack.
pub const MAX_DEPTH: usize = 400;

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    Imaginary(f64),
    Str(String),
    Name(String),

    // Keywords
    And,
    Or,
    Not,
    True,
    False,
    NoneLit,
    Ellipsis,

    // Arithmetic
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,

    // Bitwise
    Tilde,
    Ampersand,
    Pipe,
    Caret,
    ShiftLeft,
    ShiftRight,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{n}"),
            Token::Float(x) => write!(f, "{x}"),
            Token::Imaginary(x) => write!(f, "{x}j"),
            Token::Str(s) => write!(f, "{s:?}"),
            Token::Name(n) => write!(f, "{n}"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::NoneLit => write!(f, "None"),
            Token::Ellipsis => write!(f, "..."),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::DoubleStar => write!(f, "**"),
            Token::Slash => write!(f, "/"),
            Token::DoubleSlash => write!(f, "//"),
            Token::Percent => write!(f, "%"),
            Token::Tilde => write!(f, "~"),
            Token::Ampersand => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::ShiftLeft => write!(f, "<<"),
            Token::ShiftRight => write!(f, ">>"),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Eof => write!(f, "<EOF>"),
        }
    }
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Currently open `(` / `[`, innermost last.
    brackets: Vec<u8>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            brackets: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn eat(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\x0c' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn read_number(&mut self, start: usize) -> Result<Token, EvalError> {
        let mut is_float = false;

        if self.eat(b'.') {
            is_float = true;
            self.eat_digits();
        } else {
            self.eat_digits();
            if self.eat(b'.') {
                is_float = true;
                self.eat_digits();
            }
        }

        // Exponent only when digits actually follow the `e`.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() > 0 {
                is_float = true;
            } else {
                self.pos = save;
            }
        }

        let src = self.src;
        let text = &src[start..self.pos];
        let imaginary = self.eat(b'j') || self.eat(b'J');

        if matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')) {
            return Err(EvalError::syntax("invalid decimal literal", start));
        }

        let as_float = || {
            text.parse::<f64>()
                .map_err(|_| EvalError::syntax("invalid decimal literal", start))
        };

        if imaginary {
            return Ok(Token::Imaginary(as_float()?));
        }
        if is_float {
            return Ok(Token::Float(as_float()?));
        }

        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(EvalError::syntax(
                "leading zeros in decimal integer literals are not permitted",
                start,
            ));
        }
        match text.parse::<i64>() {
            Ok(n) => Ok(Token::Int(n)),
            // Wider than i64: keep the nearest float unless even that overflows.
            Err(_) => match as_float()? {
                x if x.is_finite() => Ok(Token::Float(x)),
                _ => Err(EvalError::IntTooLarge),
            },
        }
    }

    fn read_string(&mut self, quote: u8, start: usize) -> Result<Token, EvalError> {
        let mut s = String::new();
        let src = self.src;
        let mut chars = src[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, 'n')) => s.push('\n'),
                    Some((_, 't')) => s.push('\t'),
                    Some((_, c)) => s.push(c),
                    None => break,
                },
                c if c == quote as char => {
                    self.pos += i + 1;
                    return Ok(Token::Str(s));
                }
                '\n' => break,
                c => s.push(c),
            }
        }
        Err(EvalError::syntax("unterminated string literal", start))
    }

    fn read_name(&mut self, start: usize) -> Token {
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "True" => Token::True,
            "False" => Token::False,
            "None" => Token::NoneLit,
            name => Token::Name(name.to_owned()),
        }
    }

    fn open(&mut self, bracket: u8, start: usize) -> Result<(), EvalError> {
        if self.brackets.len() >= MAX_BRACKET_NESTING {
            return Err(EvalError::syntax("too many nested parentheses", start));
        }
        self.brackets.push(bracket);
        Ok(())
    }

    fn close(&mut self, bracket: u8, start: usize) -> Result<(), EvalError> {
        let opener = if bracket == b')' { b'(' } else { b'[' };
        match self.brackets.pop() {
            Some(b) if b == opener => Ok(()),
            Some(b) => Err(EvalError::syntax(
                format!(
                    "closing parenthesis '{}' does not match opening parenthesis '{}'",
                    bracket as char, b as char
                ),
                start,
            )),
            None => Err(EvalError::syntax(
                format!("unmatched '{}'", bracket as char),
                start,
            )),
        }
    }

    fn next_token(&mut self) -> Result<(Token, usize), EvalError> {
        self.skip_ws();
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok((Token::Eof, start));
        };

        if ch.is_ascii_digit() || (ch == b'.' && matches!(self.peek2(), Some(b'0'..=b'9'))) {
            return Ok((self.read_number(start)?, start));
        }
        if ch.is_ascii_alphabetic() || ch == b'_' {
            return Ok((self.read_name(start), start));
        }

        self.pos += 1;
        let tok = match ch {
            b'"' | b'\'' => self.read_string(ch, start)?,
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => {
                if self.eat(b'*') {
                    Token::DoubleStar
                } else {
                    Token::Star
                }
            }
            b'/' => {
                if self.eat(b'/') {
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            b'%' => Token::Percent,
            b'~' => Token::Tilde,
            b'&' => Token::Ampersand,
            b'|' => Token::Pipe,
            b'^' => Token::Caret,
            b'<' => {
                if self.eat(b'<') {
                    Token::ShiftLeft
                } else if self.eat(b'=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            b'>' => {
                if self.eat(b'>') {
                    Token::ShiftRight
                } else if self.eat(b'=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            b'=' if self.eat(b'=') => Token::Eq,
            b'!' if self.eat(b'=') => Token::Ne,
            b'(' => {
                self.open(b'(', start)?;
                Token::LParen
            }
            b'[' => {
                self.open(b'[', start)?;
                Token::LBracket
            }
            b')' => {
                self.close(b')', start)?;
                Token::RParen
            }
            b']' => {
                self.close(b']', start)?;
                Token::RBracket
            }
            b',' => Token::Comma,
            b'.' => {
                if self.bytes[self.pos..].starts_with(b"..") {
                    self.pos += 2;
                    Token::Ellipsis
                } else {
                    Token::Dot
                }
            }
            _ => {
                let c = self.src[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(EvalError::syntax(format!("invalid character {c:?}"), start));
            }
        };
        Ok((tok, start))
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>, EvalError> {
        let mut tokens = Vec::new();
        loop {
            let (tok, offset) = self.next_token()?;
            if tok == Token::Eof {
                if let Some(&b) = self.brackets.last() {
                    return Err(EvalError::syntax(
                        format!("'{}' was never closed", b as char),
                        offset,
                    ));
                }
                tokens.push((tok, offset));
                break;
            }
            tokens.push((tok, offset));
        }
        Ok(tokens)
    }
}

// ── AST ───────────────────────────────────────────────────────────────────────

/// A literal value as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Imaginary(f64),
    Str(String),
    Bool(bool),
    None,
    Ellipsis,
}

impl Constant {
    /// The value as an `f64` if this is an integer or float literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Constant::Int(n) => Some(*n as f64),
            Constant::Float(x) => Some(*x),
            Constant::Imaginary(_)
            | Constant::Str(_)
            | Constant::Bool(_)
            | Constant::None
            | Constant::Ellipsis => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Invert,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Constant),
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    BoolOp(BoolOp, Vec<Expr>),
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    Call(Box<Expr>, Vec<Expr>),
    Attribute(Box<Expr>, String),
    Subscript(Box<Expr>, Box<Expr>),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// A subtree together with its height, so depth limits are enforced while
/// the tree is built rather than by walking it afterwards.
struct Parsed {
    expr: Expr,
    depth: usize,
}

impl Parsed {
    fn leaf(expr: Expr) -> Self {
        Parsed { expr, depth: 1 }
    }
}

fn max_depth(items: &[Parsed]) -> usize {
    items.iter().map(|p| p.depth).max().unwrap_or(0)
}

fn into_exprs(items: Vec<Parsed>) -> Vec<Expr> {
    items.into_iter().map(|p| p.expr).collect()
}

const OR_PREC: u8 = 1;
const AND_PREC: u8 = 2;
const NOT_PREC: u8 = 3;
const CMP_PREC: u8 = 4;
/// Operand of `+x`, `-x`, `~x` and the right side of `**`.
const UNARY_PREC: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Bool(BoolOp),
    Compare(CmpOp),
    Arith(BinOp),
}

/// Infix operator and precedence for a token; higher binds tighter.
fn infix_op(tok: &Token) -> Option<(Infix, u8)> {
    let op = match tok {
        Token::Or => (Infix::Bool(BoolOp::Or), OR_PREC),
        Token::And => (Infix::Bool(BoolOp::And), AND_PREC),
        Token::Eq => (Infix::Compare(CmpOp::Eq), CMP_PREC),
        Token::Ne => (Infix::Compare(CmpOp::Ne), CMP_PREC),
        Token::Lt => (Infix::Compare(CmpOp::Lt), CMP_PREC),
        Token::Le => (Infix::Compare(CmpOp::Le), CMP_PREC),
        Token::Gt => (Infix::Compare(CmpOp::Gt), CMP_PREC),
        Token::Ge => (Infix::Compare(CmpOp::Ge), CMP_PREC),
        Token::Pipe => (Infix::Arith(BinOp::BitOr), 5),
        Token::Caret => (Infix::Arith(BinOp::BitXor), 6),
        Token::Ampersand => (Infix::Arith(BinOp::BitAnd), 7),
        Token::ShiftLeft => (Infix::Arith(BinOp::Shl), 8),
        Token::ShiftRight => (Infix::Arith(BinOp::Shr), 8),
        Token::Plus => (Infix::Arith(BinOp::Add), 9),
        Token::Minus => (Infix::Arith(BinOp::Sub), 9),
        Token::Star => (Infix::Arith(BinOp::Mul), 10),
        Token::Slash => (Infix::Arith(BinOp::Div), 10),
        Token::DoubleSlash => (Infix::Arith(BinOp::FloorDiv), 10),
        Token::Percent => (Infix::Arith(BinOp::Mod), 10),
        _ => return None,
    };
    Some(op)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Active recursive descents: groups, sequences, operator right-hand
    /// sides and prefix operators.
    recursion: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Parser {
            tokens,
            pos: 0,
            recursion: 0,
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|(t, _)| t).unwrap_or(&Token::Eof)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|&(_, o)| o)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Token {
        let t = self
            .tokens
            .get(self.pos)
            .map(|(t, _)| t.clone())
            .unwrap_or(Token::Eof);
        self.pos += 1;
        t
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> EvalError {
        match self.peek() {
            Token::Eof => EvalError::syntax("unexpected end of expression", self.offset()),
            tok => EvalError::syntax(format!("unexpected token '{tok}'"), self.offset()),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), EvalError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn node(&self, child_depth: usize, expr: Expr) -> Result<Parsed, EvalError> {
        let depth = child_depth + 1;
        if depth > MAX_DEPTH {
            return Err(EvalError::syntax("expression nested too deeply", self.offset()));
        }
        Ok(Parsed { expr, depth })
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.recursion += 1;
        if self.recursion > MAX_DEPTH {
            return Err(EvalError::syntax("expression nested too deeply", self.offset()));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.recursion -= 1;
    }

    // ── Grammar ───────────────────────────────────────────────────────────────
    //
    // Every level of nesting passes through at most parse_binary,
    // parse_prefix, parse_postfix and parse_atom, and each descent is counted
    // by enter(), so stack use is bounded by MAX_DEPTH.

    /// Top level: a single expression, or a bare comma-separated tuple.
    fn parse_testlist(&mut self) -> Result<Parsed, EvalError> {
        let first = self.parse_binary(OR_PREC)?;
        if self.peek() != &Token::Comma {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&Token::Comma) {
            if self.peek() == &Token::Eof {
                break;
            }
            items.push(self.parse_binary(OR_PREC)?);
        }
        self.node(max_depth(&items), Expr::Tuple(into_exprs(items)))
    }

    /// Infix operators binding at least as tightly as `min_prec`, by
    /// precedence climbing. Arithmetic operators are left-associative;
    /// `and`/`or` and comparisons collect into one n-ary node per chain.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Parsed, EvalError> {
        let mut lhs = self.parse_prefix(min_prec)?;
        while let Some((op, prec)) = infix_op(self.peek()) {
            if prec < min_prec {
                break;
            }
            lhs = match op {
                Infix::Arith(op) => {
                    self.pos += 1;
                    self.enter()?;
                    let rhs = self.parse_binary(prec + 1)?;
                    self.leave();
                    self.node(
                        lhs.depth.max(rhs.depth),
                        Expr::Binary(op, Box::new(lhs.expr), Box::new(rhs.expr)),
                    )?
                }
                Infix::Bool(op) => self.parse_bool_chain(lhs, op, prec)?,
                Infix::Compare(_) => self.parse_compare_chain(lhs)?,
            };
        }
        Ok(lhs)
    }

    fn parse_bool_chain(
        &mut self,
        first: Parsed,
        op: BoolOp,
        prec: u8,
    ) -> Result<Parsed, EvalError> {
        let mut values = vec![first];
        self.enter()?;
        while infix_op(self.peek()) == Some((Infix::Bool(op), prec)) {
            self.pos += 1;
            values.push(self.parse_binary(prec + 1)?);
        }
        self.leave();
        self.node(max_depth(&values), Expr::BoolOp(op, into_exprs(values)))
    }

    fn parse_compare_chain(&mut self, left: Parsed) -> Result<Parsed, EvalError> {
        let mut depth = left.depth;
        let mut rest = Vec::new();
        self.enter()?;
        while let Some((Infix::Compare(op), _)) = infix_op(self.peek()) {
            self.pos += 1;
            let rhs = self.parse_binary(CMP_PREC + 1)?;
            depth = depth.max(rhs.depth);
            rest.push((op, rhs.expr));
        }
        self.leave();
        self.node(depth, Expr::Compare(Box::new(left.expr), rest))
    }

    /// Prefix operators, then a postfix expression optionally raised to a
    /// power. `not` is only accepted where `min_prec` allows a `not_test`.
    fn parse_prefix(&mut self, min_prec: u8) -> Result<Parsed, EvalError> {
        let op = match self.peek() {
            Token::Not if min_prec <= NOT_PREC => UnaryOp::Not,
            Token::Plus => UnaryOp::Pos,
            Token::Minus => UnaryOp::Neg,
            Token::Tilde => UnaryOp::Invert,
            _ => {
                let base = self.parse_postfix()?;
                if !self.eat(&Token::DoubleStar) {
                    return Ok(base);
                }
                self.enter()?;
                let exp = self.parse_prefix(UNARY_PREC)?;
                self.leave();
                return self.node(
                    base.depth.max(exp.depth),
                    Expr::Binary(BinOp::Pow, Box::new(base.expr), Box::new(exp.expr)),
                );
            }
        };
        self.pos += 1;
        self.enter()?;
        let operand = if op == UnaryOp::Not {
            self.parse_binary(NOT_PREC)?
        } else {
            self.parse_prefix(UNARY_PREC)?
        };
        self.leave();
        self.node(operand.depth, Expr::Unary(op, Box::new(operand.expr)))
    }

    fn parse_postfix(&mut self) -> Result<Parsed, EvalError> {
        let mut target = self.parse_atom()?;
        loop {
            match self.peek() {
                Token::LParen => {
                    self.pos += 1;
                    let args = self.parse_sequence(&Token::RParen)?;
                    target = self.node(
                        target.depth.max(max_depth(&args)),
                        Expr::Call(Box::new(target.expr), into_exprs(args)),
                    )?;
                }
                Token::LBracket => {
                    self.pos += 1;
                    self.enter()?;
                    let index = self.parse_binary(OR_PREC)?;
                    self.leave();
                    self.expect(&Token::RBracket)?;
                    target = self.node(
                        target.depth.max(index.depth),
                        Expr::Subscript(Box::new(target.expr), Box::new(index.expr)),
                    )?;
                }
                Token::Dot => {
                    self.pos += 1;
                    let Token::Name(attr) = self.advance() else {
                        self.pos -= 1;
                        return Err(self.unexpected());
                    };
                    target = self.node(
                        target.depth,
                        Expr::Attribute(Box::new(target.expr), attr),
                    )?;
                }
                _ => return Ok(target),
            }
        }
    }

    /// Comma-separated expressions up to `close` (consumed); a trailing comma
    /// is allowed.
    fn parse_sequence(&mut self, close: &Token) -> Result<Vec<Parsed>, EvalError> {
        let mut items = Vec::new();
        self.enter()?;
        while !self.eat(close) {
            items.push(self.parse_binary(OR_PREC)?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                break;
            }
        }
        self.leave();
        Ok(items)
    }

    fn parse_atom(&mut self) -> Result<Parsed, EvalError> {
        let leaf = match self.advance() {
            Token::Int(n) => Expr::Constant(Constant::Int(n)),
            Token::Float(x) => Expr::Constant(Constant::Float(x)),
            Token::Imaginary(x) => Expr::Constant(Constant::Imaginary(x)),
            Token::Str(s) => Expr::Constant(Constant::Str(s)),
            Token::True => Expr::Constant(Constant::Bool(true)),
            Token::False => Expr::Constant(Constant::Bool(false)),
            Token::NoneLit => Expr::Constant(Constant::None),
            Token::Ellipsis => Expr::Constant(Constant::Ellipsis),
            Token::Name(name) => Expr::Name(name),
            Token::LParen => {
                if self.eat(&Token::RParen) {
                    return Ok(Parsed::leaf(Expr::Tuple(Vec::new())));
                }
                self.enter()?;
                let first = self.parse_binary(OR_PREC)?;
                self.leave();
                if self.eat(&Token::RParen) {
                    return Ok(first);
                }
                return self.parse_tuple_tail(first);
            }
            Token::LBracket => {
                let items = self.parse_sequence(&Token::RBracket)?;
                return self.node(max_depth(&items), Expr::List(into_exprs(items)));
            }
            _ => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
        };
        Ok(Parsed::leaf(leaf))
    }

    /// After `( first`: the rest of a parenthesised tuple.
    fn parse_tuple_tail(&mut self, first: Parsed) -> Result<Parsed, EvalError> {
        if !self.eat(&Token::Comma) {
            return Err(self.unexpected());
        }
        let mut items = vec![first];
        items.extend(self.parse_sequence(&Token::RParen)?);
        self.node(max_depth(&items), Expr::Tuple(into_exprs(items)))
    }
}

/// Parse an expression string into an AST.
pub fn parse_expr(src: &str) -> Result<Expr, EvalError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser::new(tokens);
    let parsed = parser.parse_testlist()?;
    if parser.peek() != &Token::Eof {
        return Err(parser.unexpected());
    }
    Ok(parsed.expr)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
