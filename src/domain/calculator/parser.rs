//! Restricted arithmetic grammar
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := number | 'pi' | 'e' | func '(' expr ')' | '(' expr ')'
//! func    := 'sin' | 'cos' | 'tan'
//! ```
//!
//! `**` binds tighter than a unary minus on its left and is right
//! associative, so `-2**2` is `-4` and `2**3**2` is `512`.

use serde::{Deserialize, Serialize};
use std::f64::consts;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Deepest nesting of parentheses and unary operators accepted.
const MAX_DEPTH: usize = 200;

/// Why an expression could not be evaluated
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum EvalError {
    #[error("invalid syntax: {0}")]
    Syntax(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("math range error")]
    Overflow,

    #[error("math domain error")]
    Domain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Pi,
    E,
    Func(Func),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    ParenOpen,
    ParenClose,
}

/// Functions callable from an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
}

impl Func {
    fn apply(self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
        })
    }
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
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Call(Func, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        let token = match c {
            '0'..='9' | '.' => number(&mut chars)?,
            c if c.is_ascii_alphabetic() => word(&mut chars)?,
            '+' => { chars.next(); Token::Plus }
            '-' => { chars.next(); Token::Minus }
            '%' => { chars.next(); Token::Percent }
            '(' => { chars.next(); Token::ParenOpen }
            ')' => { chars.next(); Token::ParenClose }
            '*' => {
                chars.next();
                if chars.next_if_eq(&'*').is_some() { Token::DoubleStar } else { Token::Star }
            }
            '/' => {
                chars.next();
                if chars.next_if_eq(&'/').is_some() { Token::DoubleSlash } else { Token::Slash }
            }
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            other => return Err(EvalError::Syntax(format!("unexpected character '{}'", other))),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn number(chars: &mut Peekable<Chars<'_>>) -> Result<Token, EvalError> {
    let mut literal = String::new();
    let mut seen_dot = false;
    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => literal.push(c),
            '.' if !seen_dot => {
                seen_dot = true;
                literal.push(c);
            }
            _ => break,
        }
        chars.next();
    }
    if literal == "." {
        return Err(EvalError::Syntax("lone decimal point".to_string()));
    }
    literal
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|e| EvalError::Syntax(format!("bad number '{}': {}", literal, e)))
}

fn word(chars: &mut Peekable<Chars<'_>>) -> Result<Token, EvalError> {
    let mut name = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_alphabetic()) {
        name.push(c);
    }
    match name.as_str() {
        "pi" => Ok(Token::Pi),
        "e" => Ok(Token::E),
        "sin" => Ok(Token::Func(Func::Sin)),
        "cos" => Ok(Token::Func(Func::Cos)),
        "tan" => Ok(Token::Func(Func::Tan)),
        other => Err(EvalError::Syntax(format!("unknown name '{}'", other))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::Syntax("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::DoubleSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.descend()?;
                let inner = self.unary();
                self.depth -= 1;
                inner
            }
            Some(Token::Minus) => {
                self.advance();
                self.descend()?;
                let inner = self.unary();
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner?)))
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.advance();
            self.descend()?;
            let exponent = self.unary();
            self.depth -= 1;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent?)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Pi) => Ok(Expr::Number(consts::PI)),
            Some(Token::E) => Ok(Expr::Number(consts::E)),
            Some(Token::Func(func)) => {
                if self.advance() != Some(Token::ParenOpen) {
                    return Err(EvalError::Syntax(format!("{} must be called with parentheses", func)));
                }
                let arg = self.group()?;
                Ok(Expr::Call(func, Box::new(arg)))
            }
            Some(Token::ParenOpen) => self.group(),
            Some(token) => Err(EvalError::Syntax(format!("unexpected {:?}", token))),
            None => Err(EvalError::Syntax("unexpected end of expression".to_string())),
        }
    }

    /// Remainder of a parenthesised group, after the opening parenthesis.
    fn group(&mut self) -> Result<Expr, EvalError> {
        self.descend()?;
        let inner = self.expr()?;
        self.depth -= 1;
        match self.advance() {
            Some(Token::ParenClose) => Ok(inner),
            _ => Err(EvalError::Syntax("unbalanced parentheses".to_string())),
        }
    }
}

/// Parse an expression into a tree
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Syntax("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(EvalError::Syntax(format!("unexpected {:?}", token))),
    }
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else if value.is_nan() {
        Err(EvalError::Domain)
    } else {
        Err(EvalError::Overflow)
    }
}

fn floor_div(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    finite((a / b).floor())
}

/// Modulo taking the sign of the divisor.
fn modulo(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn power(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvalError::Domain);
    }
    finite(base.powf(exponent))
}

impl Expr {
    /// Evaluate the tree
    pub fn eval(&self) -> Result<f64, EvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Neg(inner) => Ok(-inner.eval()?),
            Expr::Call(func, arg) => finite(func.apply(arg.eval()?)),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval()?;
                let b = rhs.eval()?;
                match op {
                    BinOp::Add => finite(a + b),
                    BinOp::Sub => finite(a - b),
                    BinOp::Mul => finite(a * b),
                    BinOp::Div if b == 0.0 => Err(EvalError::DivisionByZero),
                    BinOp::Div => finite(a / b),
                    BinOp::FloorDiv => floor_div(a, b),
                    BinOp::Mod => modulo(a, b),
                    BinOp::Pow => power(a, b),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Result<f64, EvalError> {
        parse(input)?.eval()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
        assert_eq!(eval("10-4-3"), Ok(3.0));
        assert_eq!(eval("2**3**2"), Ok(512.0));
        assert_eq!(eval("-2**2"), Ok(-4.0));
        assert_eq!(eval("2**-1"), Ok(0.5));
        assert_eq!(eval("--3"), Ok(3.0));
    }

    #[test]
    fn test_floor_division_and_modulo_follow_divisor_sign() {
        assert_eq!(eval("7//2"), Ok(3.0));
        assert_eq!(eval("-7//2"), Ok(-4.0));
        assert_eq!(eval("-7%3"), Ok(2.0));
        assert_eq!(eval("7%-3"), Ok(-2.0));
    }

    #[test]
    fn test_constants_and_functions() {
        let two_pi = eval("2*pi").unwrap();
        assert!((two_pi - 6.283185307179586).abs() < 1e-12);
        assert!((eval("sin(pi/2)").unwrap() - 1.0).abs() < 1e-12);
        assert!((eval("cos(0)+e").unwrap() - (1.0 + consts::E)).abs() < 1e-12);
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["", "5+*3", "(1+2", "1+2)", "sin 1", "pie", "1.2.3", ".", "3(4)", "pi2"] {
            assert!(
                matches!(eval(input), Err(EvalError::Syntax(_))),
                "{:?} should be a syntax error",
                input
            );
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("5/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("5//0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("5%0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("0**-1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_range_and_domain() {
        assert_eq!(eval("10**400"), Err(EvalError::Overflow));
        assert_eq!(eval("(-8)**(1/3)"), Err(EvalError::Domain));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(eval(&deep), Err(EvalError::Syntax(_))));

        let fine = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(eval(&fine), Ok(1.0));

        let negations = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(eval(&negations), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_error_wire_format() {
        let json = serde_json::to_string(&EvalError::DivisionByZero).unwrap();
        assert_eq!(json, r#"{"kind":"division_by_zero"}"#);
        let back: EvalError = serde_json::from_str(r#"{"kind":"syntax","detail":"x"}"#).unwrap();
        assert_eq!(back, EvalError::Syntax("x".to_string()));
    }
}
