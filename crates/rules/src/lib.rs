//! Rule-tree condition evaluator.
//!
//! Decides element visibility by evaluating a [`Condition`](stencil_types::Condition)
//! (a leaf [`Rule`](stencil_types::Rule) or a nested
//! [`RuleGroup`](stencil_types::RuleGroup)) against a dataset. Evaluation is
//! total: unknown operators, missing fields and type mismatches all produce
//! `false` rather than an error, because rule inputs come from end-user forms.

pub mod evaluator;
pub mod functions;
pub mod operators;

pub use evaluator::{evaluate, evaluate_group, evaluate_rule};
pub use functions::{apply_function, apply_optional};
pub use operators::compare;

use stencil_jpath::Scope;
use stencil_types::{Condition, Dataset};

/// Evaluates `condition` directly against a dataset, with no loop locals.
pub fn evaluate_in(condition: &Condition, dataset: &Dataset) -> bool {
    evaluate(condition, &Scope::new(dataset))
}
