//! Dataset path lookup and value coercion.
//!
//! Paths use dotted keys and bracketed indices (`order.items[0].price`) and are
//! parsed with `nom`. Lookups never fail: a missing path reads as the empty
//! string. The [`coerce`] module defines how values convert between text,
//! numbers and truthiness for every other stage of the engine.

pub mod ast;
pub mod coerce;
pub mod error;
mod parser;
pub mod scope;

// --- Public API ---
pub use ast::{Path, PathSegment};
pub use coerce::{format_plain, is_empty, loose_eq, number_value, parse_number, to_number, to_text};
pub use error::JPathError;
pub use parser::parse_path;
pub use scope::Scope;
