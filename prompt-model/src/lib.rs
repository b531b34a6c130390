//! Core shared value types for the prompt composer.

#![warn(missing_docs, clippy::pedantic)]

mod conditions;
mod path;
mod value;

/// Condition mapping alias and evaluation against a context.
pub use conditions::{Conditions, conditions_match};
/// Dotted-path lookup into nested mapping data.
pub use path::resolve_path;
/// Tagged value variant and the insertion-ordered mapping alias.
pub use value::{Mapping, Value};
