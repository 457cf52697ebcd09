//! Evaluates a parsed arithmetic [`Expression`].
use crate::ast::{BinaryOperator, Expression, UnaryOperator};

/// Evaluates an expression tree. Division by zero yields `0` for that operation
/// instead of an infinity, and evaluation then continues normally.
pub fn evaluate(expr: &Expression) -> f64 {
    match expr {
        Expression::Number(n) => *n,
        Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => -evaluate(expr),
        Expression::BinaryOp { left, op, right } => {
            let l = evaluate(left);
            let r = evaluate(right);
            match op {
                BinaryOperator::Plus => l + r,
                BinaryOperator::Minus => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide if r == 0.0 => 0.0,
                BinaryOperator::Divide => l / r,
            }
        }
    }
}
