//! Flat state (de)serialization for [`PromptBuilder`].
//!
//! The wire shape is a top-level mapping with `meta`, `order`, and `sections`
//! keys. Deserializing previously serialized state and recompiling with the
//! same context yields byte-identical output.

use crate::builder::PromptBuilder;
use crate::error::{PromptError, PromptResult};

impl PromptBuilder {
    /// Serializes the builder state to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Json`] when encoding fails.
    pub fn to_json(&self) -> PromptResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes the builder state to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Json`] when encoding fails.
    pub fn to_json_compact(&self) -> PromptResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a builder from a JSON document produced by
    /// [`to_json`](Self::to_json).
    ///
    /// Section names missing from the stored entries default to their map
    /// key; a missing order defaults to the section keys.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidFormat`] when the top-level value is not
    /// a mapping, or [`PromptError::Json`] when parsing fails.
    pub fn from_json(source: &str) -> PromptResult<Self> {
        if !source.trim_start().starts_with('{') {
            return Err(PromptError::InvalidFormat);
        }
        let mut builder: Self = serde_json::from_str(source)?;
        builder.restore_invariants();
        Ok(builder)
    }

    /// Serializes the builder state to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Yaml`] when encoding fails.
    #[cfg(feature = "yaml")]
    pub fn to_yaml(&self) -> PromptResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Restores a builder from a YAML document produced by
    /// [`to_yaml`](Self::to_yaml). An empty document yields an empty builder.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidFormat`] when the top-level value is not
    /// a mapping, or [`PromptError::Yaml`] when parsing fails.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(source: &str) -> PromptResult<Self> {
        if source.trim().is_empty() {
            return Ok(Self::new());
        }
        let document: serde_yaml::Value = serde_yaml::from_str(source)?;
        match document {
            serde_yaml::Value::Null => Ok(Self::new()),
            serde_yaml::Value::Mapping(_) => {
                let mut builder: Self = serde_yaml::from_value(document)?;
                builder.restore_invariants();
                Ok(builder)
            }
            _ => Err(PromptError::InvalidFormat),
        }
    }

    /// YAML support is compiled out; always fails.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::YamlUnavailable`].
    #[cfg(not(feature = "yaml"))]
    pub fn to_yaml(&self) -> PromptResult<String> {
        Err(PromptError::YamlUnavailable)
    }

    /// YAML support is compiled out; always fails.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::YamlUnavailable`].
    #[cfg(not(feature = "yaml"))]
    pub fn from_yaml(_source: &str) -> PromptResult<Self> {
        Err(PromptError::YamlUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_model::Value;

    use crate::section::SectionOptions;

    fn sample() -> PromptBuilder {
        let mut prompt = PromptBuilder::new();
        prompt.meta_mut().insert("version".to_owned(), Value::from(1));
        prompt.set_with(
            "role",
            "You are {{user.role}}.",
            SectionOptions {
                title: Some("Role".into()),
                ..Default::default()
            },
        );
        prompt.set_with(
            "workflow",
            ["Collect", "Analyze"],
            SectionOptions {
                ordered: true,
                ..Default::default()
            },
        );
        prompt
    }

    fn context() -> Value {
        Value::from_iter([("user", Value::from_iter([("role", "tester")]))])
    }

    #[test]
    fn json_round_trip_compiles_identically() {
        let prompt = sample();
        let ctx = context();
        let original = prompt.compile_with(crate::CompileOptions {
            context: Some(&ctx),
            ..Default::default()
        });

        let restored = PromptBuilder::from_json(&prompt.to_json().unwrap()).unwrap();
        let recompiled = restored.compile_with(crate::CompileOptions {
            context: Some(&ctx),
            ..Default::default()
        });
        assert_eq!(original, recompiled);
    }

    #[test]
    fn json_state_keeps_meta_and_order() {
        let mut prompt = sample();
        prompt.set_order(["workflow", "role"]);

        let restored = PromptBuilder::from_json(&prompt.to_json_compact().unwrap()).unwrap();
        assert_eq!(restored.order(), ["workflow", "role"]);
        assert_eq!(restored.meta()["version"], Value::from(1));
    }

    #[test]
    fn non_mapping_json_is_a_format_error() {
        let err = PromptBuilder::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, PromptError::InvalidFormat));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PromptBuilder::from_json("{not json").unwrap_err();
        assert!(matches!(err, PromptError::Json { .. }));
    }

    #[test]
    fn missing_order_defaults_to_section_keys() {
        let source = r#"{"sections": {"a": {"content": "A"}, "b": {"content": "B"}}}"#;
        let restored = PromptBuilder::from_json(source).unwrap();
        assert_eq!(restored.order(), ["a", "b"]);
        assert_eq!(restored.section("a").unwrap().name, "a");
        assert_eq!(restored.compile(), "A\n\nB");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_round_trip_compiles_identically() {
        let prompt = sample();
        let restored = PromptBuilder::from_yaml(&prompt.to_yaml().unwrap()).unwrap();
        assert_eq!(prompt.compile(), restored.compile());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn empty_yaml_yields_empty_builder() {
        let restored = PromptBuilder::from_yaml("").unwrap();
        assert!(restored.is_empty());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn non_mapping_yaml_is_a_format_error() {
        let err = PromptBuilder::from_yaml("- 1\n- 2\n").unwrap_err();
        assert!(matches!(err, PromptError::InvalidFormat));
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn yaml_reports_unavailable_without_the_feature() {
        let err = PromptBuilder::new().to_yaml().unwrap_err();
        assert!(matches!(err, PromptError::YamlUnavailable));
        let err = PromptBuilder::from_yaml("meta: {}").unwrap_err();
        assert!(matches!(err, PromptError::YamlUnavailable));
    }
}
