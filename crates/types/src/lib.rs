//! Foundation types shared by every stage of the stencil pipeline.
//!
//! Everything here is plain data: templates and datasets come in through
//! serde, a [`Document`] goes out. No evaluation logic lives in this crate.

mod de;
pub mod dataset;
pub mod document;
pub mod element;
pub mod geometry;
pub mod rules;

pub use dataset::Dataset;
pub use document::{Document, ResolvedElement, ResolvedPage};
pub use element::{ElementTemplate, LoopKind, LoopSpec, Page, Template};
pub use geometry::Rect;
pub use rules::{Condition, FunctionKind, Logic, OperatorKind, Rule, RuleGroup};
