//! Stencil resolves declarative page templates against a data record.
//!
//! A [`Template`] is a list of pages holding absolutely positioned elements.
//! Each element may carry a rule tree deciding whether it appears, a loop
//! definition that repeats it, and content with `{field}`, `{math:...}`
//! and `{if:field=value}...{/if}` tokens. Assembly produces a [`Document`] of
//! concrete elements ready for a rendering backend.
//!
//! ```no_run
//! use stencil::{Engine, load_dataset, load_template};
//!
//! # fn main() -> Result<(), stencil::StencilError> {
//! let template = load_template("invoice.json")?;
//! let dataset = load_dataset("submission.json")?;
//! let document = Engine::new().assemble(&template, &dataset);
//! println!("{}", serde_json::to_string_pretty(&document)?);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod executor;
pub mod loader;

pub use engine::{Engine, EngineBuilder};
pub use error::StencilError;
pub use executor::{Executor, ExecutorImpl, SyncExecutor};
#[cfg(feature = "rayon-executor")]
pub use executor::RayonExecutor;
pub use loader::{
    apply_override, load_condition, load_dataset, load_template, parse_condition, parse_dataset,
    parse_template,
};

// Re-export the evaluation crates so callers need a single dependency.
pub use stencil_jpath::{self as jpath, Scope};
pub use stencil_math::{self as math, eval_math, eval_math_formatted};
pub use stencil_rules::{self as rules, evaluate_in};
pub use stencil_template::{
    Assembly, AssemblyWarning, EngineConfig, assemble, assemble_with, assemble_with_report, expand,
    resolve,
};
pub use stencil_types::{
    Condition, Dataset, Document, ElementTemplate, FunctionKind, Logic, LoopSpec, OperatorKind,
    Page, Rect, ResolvedElement, ResolvedPage, Rule, RuleGroup, Template,
};
