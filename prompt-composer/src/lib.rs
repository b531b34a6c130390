//! Composable prompt documents built from named, conditional sections.
//!
//! A [`PromptBuilder`] owns an ordered set of [`Section`]s. Payloads (strings,
//! sequences, sets, or mappings) are coerced to indented bullet text at
//! assignment time; at compile time each section is filtered by its
//! conditions, interpolated against a context, and joined into one document.
//!
//! # Examples
//!
//! ```
//! use prompt_composer::{CompileOptions, PromptBuilder, SectionOptions};
//! use prompt_model::Value;
//!
//! let mut prompt = PromptBuilder::new();
//! prompt.set_with(
//!     "workflow",
//!     ["Collect data", "Analyze"],
//!     SectionOptions {
//!         title: Some("Workflow".into()),
//!         ordered: true,
//!         ..Default::default()
//!     },
//! );
//! prompt.set("language", "Answer in {{user.lang}}.");
//!
//! let context = Value::from_iter([("user", Value::from_iter([("lang", "pt-BR")]))]);
//! let output = prompt.compile_with(CompileOptions {
//!     context: Some(&context),
//!     ..Default::default()
//! });
//! assert!(output.contains("# Workflow"));
//! assert!(output.contains("1. Collect data"));
//! assert!(output.contains("Answer in pt-BR."));
//! ```

#![warn(missing_docs, clippy::pedantic)]

mod builder;
mod error;
mod macros;
mod render;
mod section;
mod state;

/// Section registry, compilation, and compile options.
pub use builder::{CompileOptions, PromptBuilder};
/// Error type and result alias for prompt operations.
pub use error::{PromptError, PromptResult};
/// Mustache-like `{{path}}` interpolation.
pub use macros::interpolate;
/// Nested payload rendering and payload-to-text coercion.
pub use render::{coerce_payload, render_lines};
/// Section data type, its builder, and set/append options.
pub use section::{Section, SectionBuilder, SectionOptions};

/// Re-export of the shared value primitives.
pub use prompt_model as model;
