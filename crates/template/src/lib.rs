//! Template evaluation: placeholder resolution, loop expansion and page
//! assembly.
//!
//! [`assemble`] is the entry point. It filters each page's elements through
//! their conditions, expands looping elements into stacked siblings and
//! resolves the `{field}`, `{math:...}` and `{if:...}` tokens in every
//! element's content. The pass is pure: the same template and dataset always
//! produce the same [`Document`](stencil_types::Document).

pub mod assembler;
pub mod config;
pub mod loops;
pub mod placeholder;
pub mod report;

pub use assembler::{Assembly, assemble, assemble_with, assemble_with_report};
pub use config::{
    DEFAULT_STACK_GAP, EngineConfig, FOR_CEILING, FOREACH_CEILING, WHILE_CEILING,
};
pub use loops::{expand, expand_with};
pub use placeholder::{Resolver, resolve, resolve_in};
pub use report::{AssemblyWarning, Warnings};
