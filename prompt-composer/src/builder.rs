//! Ordered section registry and prompt compilation.

use indexmap::IndexMap;
use prompt_model::{Mapping, Value, conditions_match};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{PromptError, PromptResult};
use crate::render::coerce_payload;
use crate::section::{Section, SectionOptions};

/// Options controlling one [`PromptBuilder::compile_with`] pass.
#[derive(Clone, Copy, Debug)]
pub struct CompileOptions<'a> {
    /// Context used for macro interpolation and condition evaluation.
    pub context: Option<&'a Value>,
    /// Separator placed between rendered sections.
    pub joiner: &'a str,
    /// Keep header-only placeholders for sections that render empty.
    pub include_empty: bool,
}

impl Default for CompileOptions<'_> {
    fn default() -> Self {
        Self {
            context: None,
            joiner: "\n\n",
            include_empty: false,
        }
    }
}

/// Ordered collection of named sections compiled into one prompt document.
///
/// Sections are kept in an insertion-ordered map plus an explicit `order`
/// list; the list always contains exactly the stored section names.
/// Re-setting an existing name replaces its content in place without moving
/// it. Metadata is an opaque mapping passed through serialization unchanged.
///
/// # Examples
///
/// ```
/// use prompt_composer::{PromptBuilder, SectionOptions};
///
/// let mut prompt = PromptBuilder::new();
/// prompt.set_with(
///     "role",
///     "You are a data analyst.",
///     SectionOptions { title: Some("Role".into()), ..Default::default() },
/// );
/// prompt.set_with(
///     "objective",
///     ["Find patterns", "Be concise"],
///     SectionOptions { title: Some("Objective".into()), header_level: 2, ordered: true, ..Default::default() },
/// );
///
/// let output = prompt.compile();
/// assert!(output.contains("# Role"));
/// assert!(output.contains("## Objective"));
/// assert!(output.contains("1. Find patterns"));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PromptBuilder {
    #[serde(default)]
    meta: Mapping,
    #[serde(default)]
    order: Vec<String>,
    #[serde(default)]
    sections: IndexMap<String, Section>,
}

impl PromptBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a section from a payload with default options.
    ///
    /// The payload is coerced to text now, not at compile time.
    pub fn set(&mut self, name: impl Into<String>, payload: impl Into<Value>) -> &mut Self {
        self.set_with(name, payload, SectionOptions::default())
    }

    /// Sets a section from a payload with explicit options.
    ///
    /// Replacing an existing name keeps its position in the compile order.
    pub fn set_with(
        &mut self,
        name: impl Into<String>,
        payload: impl Into<Value>,
        options: SectionOptions,
    ) -> &mut Self {
        let name = name.into();
        let content = coerce_payload(&payload.into(), options.ordered);
        debug!(
            section = %name,
            replaced = self.sections.contains_key(&name),
            "set section"
        );
        self.insert_section(Section {
            name: name.clone(),
            content,
            max_chars: options.max_chars,
            title: options.title,
            include_if: options.include_if,
            header_level: options.header_level,
        });
        self
    }

    /// Appends a payload to a section, creating it when absent.
    pub fn append(&mut self, name: impl Into<String>, payload: impl Into<Value>) -> &mut Self {
        self.append_with(name, payload, SectionOptions::default())
    }

    /// Appends a payload to a section with explicit options.
    ///
    /// When the section is missing this behaves as
    /// [`set_with`](Self::set_with). Otherwise the coerced payload is joined
    /// to the existing content with a newline and the existing section keeps
    /// its title, truncation, conditions, and header level; only
    /// `options.ordered` affects the coercion.
    pub fn append_with(
        &mut self,
        name: impl Into<String>,
        payload: impl Into<Value>,
        options: SectionOptions,
    ) -> &mut Self {
        let name = name.into();
        if !self.sections.contains_key(&name) {
            return self.set_with(name, payload, options);
        }

        let added = coerce_payload(&payload.into(), options.ordered);
        if let Some(existing) = self.sections.get_mut(&name) {
            existing.content = format!("{}\n{added}", existing.content).trim().to_owned();
        }
        self
    }

    /// Inserts a fully-formed section.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::DuplicateSection`] when `replace` is false and
    /// a section with the same name already exists.
    pub fn add_section(&mut self, section: Section, replace: bool) -> PromptResult<&mut Self> {
        if !replace && self.sections.contains_key(&section.name) {
            return Err(PromptError::DuplicateSection { name: section.name });
        }
        self.insert_section(section);
        Ok(self)
    }

    /// Bulk-inserts sections; iteration order defines append order for new
    /// names.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::DuplicateSection`] on the first conflicting
    /// name when `replace` is false; earlier sections stay inserted.
    pub fn add_sections(
        &mut self,
        sections: impl IntoIterator<Item = Section>,
        replace: bool,
    ) -> PromptResult<&mut Self> {
        for section in sections {
            self.add_section(section, replace)?;
        }
        Ok(self)
    }

    /// Replaces the compile order.
    ///
    /// Unknown names are dropped; existing sections not mentioned are
    /// appended in their current relative order.
    pub fn set_order<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| self.sections.contains_key(name))
            .collect();
        for name in self.sections.keys() {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }
        self.order = order;
        self
    }

    /// Removes a section from the registry and the order; no-op when absent.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if self.sections.shift_remove(name).is_some() {
            debug!(section = %name, "removed section");
        }
        self.order.retain(|entry| entry != name);
        self
    }

    /// Returns a stored section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Returns true when a section with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Iterates stored sections in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Returns the compile order.
    #[must_use]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Returns the number of stored sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true when no sections are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns the opaque metadata mapping.
    #[must_use]
    pub const fn meta(&self) -> &Mapping {
        &self.meta
    }

    /// Returns the opaque metadata mapping for mutation.
    pub fn meta_mut(&mut self) -> &mut Mapping {
        &mut self.meta
    }

    /// Compiles with no context, the default joiner, and empties dropped.
    #[must_use]
    pub fn compile(&self) -> String {
        self.compile_with(CompileOptions::default())
    }

    /// Compiles the prompt: walks the order, skips sections whose conditions
    /// reject the context, renders the rest, and joins the results.
    ///
    /// Sections rendering empty are dropped unless `include_empty` is set, in
    /// which case their header (or an empty placeholder) is kept.
    #[must_use]
    pub fn compile_with(&self, options: CompileOptions<'_>) -> String {
        let mut parts = Vec::new();
        for name in &self.order {
            let Some(section) = self.sections.get(name) else {
                warn!(section = %name, "order entry has no matching section");
                continue;
            };

            if let Some(conditions) = &section.include_if {
                if !conditions_match(conditions, options.context) {
                    trace!(section = %name, "conditions rejected section");
                    continue;
                }
            }

            let rendered = section.render(options.context);
            if !rendered.is_empty() {
                parts.push(rendered);
            } else if options.include_empty {
                parts.push(section.header(options.context).unwrap_or_default());
            } else {
                trace!(section = %name, "dropped empty section");
            }
        }
        parts.join(options.joiner)
    }

    fn insert_section(&mut self, section: Section) {
        let name = section.name.clone();
        self.sections.insert(name.clone(), section);
        if !self.order.contains(&name) {
            self.order.push(name);
        }
    }

    /// Repairs invariants after deserialization: section names default to
    /// their map key and an absent order defaults to the section keys.
    pub(crate) fn restore_invariants(&mut self) {
        for (key, section) in &mut self.sections {
            if section.name.is_empty() {
                section.name.clone_from(key);
            }
        }
        if self.order.is_empty() {
            self.order = self.sections.keys().cloned().collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(title: &str) -> SectionOptions {
        SectionOptions {
            title: Some(title.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn compiles_sections_in_insertion_order() {
        let mut prompt = PromptBuilder::new();
        prompt.set_with("a", "first", options("A"));
        prompt.set_with("b", "second", options("B"));
        assert_eq!(prompt.compile(), "# A\nfirst\n\n# B\nsecond");
    }

    #[test]
    fn reset_preserves_position() {
        let mut prompt = PromptBuilder::new();
        prompt.set("a", "first").set("b", "second").set("a", "updated");
        assert_eq!(prompt.compile(), "updated\n\nsecond");
        assert_eq!(prompt.order(), ["a", "b"]);
    }

    #[test]
    fn set_order_filters_and_appends_missing() {
        let mut prompt = PromptBuilder::new();
        prompt.set("a", "A").set("b", "B").set("c", "C");
        prompt.set_order(["c", "ghost", "a"]);
        assert_eq!(prompt.order(), ["c", "a", "b"]);
        assert_eq!(prompt.compile(), "C\n\nA\n\nB");
    }

    #[test]
    fn remove_drops_section_and_order_entry() {
        let mut prompt = PromptBuilder::new();
        prompt.set("a", "A").set("b", "B");
        prompt.remove("a").remove("ghost");
        assert_eq!(prompt.order(), ["b"]);
        assert_eq!(prompt.compile(), "B");
    }

    #[test]
    fn append_creates_then_concatenates() {
        let mut prompt = PromptBuilder::new();
        prompt.append("constraints", Value::from_iter([("avoid", Value::from(["jargon", "cursing"]))]));
        prompt.append("constraints", Value::from_iter([("style", "clear")]));
        let out = prompt.compile();
        assert!(prompt.contains("constraints"));
        assert!(out.contains("- avoid\n  - jargon\n  - cursing"));
        assert!(out.contains("- style: clear"));
    }

    #[test]
    fn append_preserves_existing_section_settings() {
        let mut prompt = PromptBuilder::new();
        prompt.set_with("notes", "one", options("Notes"));
        prompt.append("notes", "two");
        let section = prompt.section("notes").unwrap();
        assert_eq!(section.title.as_deref(), Some("Notes"));
        assert_eq!(section.content, "one\ntwo");
    }

    #[test]
    fn add_section_rejects_duplicates_without_replace() {
        let mut prompt = PromptBuilder::new();
        prompt.set("policy", "- No secrets");
        let duplicate = Section::new("policy");
        let err = prompt.add_section(duplicate, false).unwrap_err();
        assert!(matches!(err, PromptError::DuplicateSection { name } if name == "policy"));
    }

    #[test]
    fn add_section_replaces_when_allowed() {
        let mut prompt = PromptBuilder::new();
        prompt.set("policy", "old");
        let replacement = Section::builder("policy").content("new").build();
        prompt.add_section(replacement, true).unwrap();
        assert_eq!(prompt.compile(), "new");
    }

    #[test]
    fn conditions_gate_sections_per_context() {
        let mut prompt = PromptBuilder::new();
        let mut opts = options("Admin Tools");
        opts.header_level = 3;
        opts.include_if = Some(
            [("user.role".to_owned(), Value::from(["admin", "owner"]))]
                .into_iter()
                .collect(),
        );
        prompt.set_with("admin-tools", ["Manage users", "Audit logs"], opts);

        let owner = Value::from_iter([("user", Value::from_iter([("role", "owner")]))]);
        let member = Value::from_iter([("user", Value::from_iter([("role", "member")]))]);

        let compiled = prompt.compile_with(CompileOptions {
            context: Some(&owner),
            ..Default::default()
        });
        assert!(compiled.contains("Admin Tools"));

        let compiled = prompt.compile_with(CompileOptions {
            context: Some(&member),
            ..Default::default()
        });
        assert!(compiled.is_empty());

        assert!(prompt.compile().is_empty());
    }

    #[test]
    fn include_empty_keeps_header_only_placeholders() {
        let mut prompt = PromptBuilder::new();
        prompt.set_with("ghost", "", options("Ghost"));
        prompt.set("real", "text");
        assert_eq!(prompt.compile(), "text");

        let compiled = prompt.compile_with(CompileOptions {
            include_empty: true,
            ..Default::default()
        });
        assert_eq!(compiled, "# Ghost\n\ntext");
    }

    #[test]
    fn custom_joiner_separates_sections() {
        let mut prompt = PromptBuilder::new();
        prompt.set("a", "A").set("b", "B");
        let compiled = prompt.compile_with(CompileOptions {
            joiner: "\n---\n",
            ..Default::default()
        });
        assert_eq!(compiled, "A\n---\nB");
    }

    #[test]
    fn metadata_is_opaque_and_mutable() {
        let mut prompt = PromptBuilder::new();
        prompt.meta_mut().insert("version".to_owned(), Value::from(2));
        assert_eq!(prompt.meta()["version"], Value::from(2));
    }
}
