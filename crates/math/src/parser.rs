//! A `nom`-based recursive-descent parser for arithmetic expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary          := ('+' | '-')* primary
//! primary        := number | '(' additive ')'
//! ```

use super::ast::*;
use crate::error::MathError;
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
};

/// Maximum parenthesis nesting accepted before parsing starts.
pub const MAX_DEPTH: usize = 32;

/// Maximum expression length accepted before parsing starts. Bounds the depth
/// of the left-leaning operator tree built for long `a+b+c+...` chains.
pub const MAX_LEN: usize = 4096;

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, MathError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(MathError::Empty);
    }
    if input.len() > MAX_LEN {
        return Err(MathError::MathParse(
            format!("{}...", input.chars().take(32).collect::<String>()),
            format!("Expression longer than {} bytes", MAX_LEN),
        ));
    }
    if nesting_depth(input) > MAX_DEPTH {
        return Err(MathError::TooDeep(MAX_DEPTH));
    }
    match expression(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(MathError::MathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(MathError::MathParse(input.to_string(), e.to_string())),
    }
}

fn nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    ws(additive_expr).parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('*'), |_| BinaryOperator::Multiply),
        map(char('/'), |_| BinaryOperator::Divide),
    ))
    .parse(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

/// Any run of signs collapses to at most one negation, so `--5` does not
/// build a nested tree.
fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let (i, signs) = many0(ws(alt((char('-'), char('+'))))).parse(input)?;
    let (i, expr) = primary_expr(i)?;

    let negations = signs.iter().filter(|&&c| c == '-').count();
    if negations % 2 == 1 {
        Ok((
            i,
            Expression::UnaryOp {
                op: UnaryOperator::Minus,
                expr: Box::new(expr),
            },
        ))
    } else {
        Ok((i, expr))
    }
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        number,
        delimited(char('('), expression, char(')')),
    )))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Expression> {
    let (i, text) = recognize(alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    )))
    .parse(input)?;
    // The recognized text is always a valid float literal.
    let value = text.parse::<f64>().unwrap_or(0.0);
    Ok((i, Expression::Number(value)))
}
