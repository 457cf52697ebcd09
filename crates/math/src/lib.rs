//! Safe arithmetic for `{math:...}` placeholders.
//!
//! Expression text can come straight from a submitted web form, so it is never
//! handed to anything resembling a general-purpose evaluator. Input is first
//! reduced to digits, `+ - * / ( )`, decimal points and whitespace; the rest is
//! stripped. What remains is parsed by a small recursive-descent grammar and
//! evaluated over `f64`. Every failure, from a syntax error to an infinite
//! result, evaluates to `0`.

pub mod ast;
pub mod engine;
pub mod error;
pub mod parser;

pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use engine::evaluate;
pub use error::MathError;
pub use parser::parse_expression;

/// Decimal places used for formatted results unless the caller asks otherwise.
pub const DEFAULT_PRECISION: usize = 2;

/// Upper bound on requested precision.
pub const MAX_PRECISION: usize = 10;

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.' | ' ' | '\t' | '\n' | '\r')
}

/// Removes every character outside the arithmetic alphabet.
pub fn sanitize(expr: &str) -> String {
    expr.chars().filter(|&c| is_allowed(c)).collect()
}

/// Sanitizes, parses and evaluates `expr`. Malformed input evaluates to `0`.
pub fn eval_math(expr: &str) -> f64 {
    let cleaned = sanitize(expr);
    match parse_expression(&cleaned) {
        Ok(ast) => {
            let value = evaluate(&ast);
            if value.is_finite() { value } else { 0.0 }
        }
        Err(MathError::Empty) => 0.0,
        Err(e) => {
            log::warn!("Malformed arithmetic expression evaluates to 0: {}", e);
            0.0
        }
    }
}

/// Formats `value` with a fixed number of decimals, never producing `-0.00`.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let precision = precision.min(MAX_PRECISION);
    let value = if value.is_finite() { value } else { 0.0 };
    let text = format!("{:.*}", precision, value);
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => text,
    }
}

/// [`eval_math`] followed by [`format_fixed`].
pub fn eval_math_formatted(expr: &str, precision: usize) -> String {
    format_fixed(eval_math(expr), precision)
}
