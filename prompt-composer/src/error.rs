//! Error types for prompt composition and state I/O.

use thiserror::Error;

/// Result alias for prompt operations.
pub type PromptResult<T> = Result<T, PromptError>;

/// Errors emitted while composing prompts or loading serialized state.
#[derive(Debug, Error)]
pub enum PromptError {
    /// A section with this name already exists and replacement was not allowed.
    #[error("section `{name}` already exists; pass replace to overwrite")]
    DuplicateSection {
        /// Name of the conflicting section.
        name: String,
    },

    /// Serialized state whose top-level value is not a mapping.
    #[error("prompt state must be a mapping at the top level")]
    InvalidFormat,

    /// JSON (de)serialization failure.
    #[error("json error: {source}")]
    Json {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },

    /// YAML (de)serialization failure.
    #[cfg(feature = "yaml")]
    #[error("yaml error: {source}")]
    Yaml {
        /// Source [`serde_yaml::Error`].
        #[from]
        source: serde_yaml::Error,
    },

    /// YAML support was requested but the `yaml` feature is disabled.
    #[error("yaml support is not enabled; rebuild with the `yaml` feature")]
    YamlUnavailable,
}
