//! Named prompt sections with headers, truncation, and inclusion conditions.

use prompt_model::{Conditions, Value};
use serde::{Deserialize, Serialize};

use crate::macros::interpolate;
use crate::render::coerce_payload;

const ELLIPSIS: char = '…';

fn default_header_level() -> u8 {
    1
}

/// A named, independently renderable block of prompt text.
///
/// Content is stored pre-rendered: payloads are coerced to text when the
/// section is built or assigned, never at compile time. The `title` acts as
/// the header text; a title that already starts with `#` is treated as an
/// explicit Markdown header, otherwise one is composed from `header_level`.
///
/// # Examples
///
/// ```
/// use prompt_composer::Section;
///
/// let section = Section::builder("objective")
///     .payload(["Find patterns", "Be concise"])
///     .ordered(true)
///     .title("Objective")
///     .header_level(2)
///     .build();
/// assert_eq!(section.render(None), "## Objective\n1. Find patterns\n2. Be concise");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    /// Unique name within the owning builder; stable across reordering.
    #[serde(default)]
    pub name: String,
    /// Pre-rendered text content.
    #[serde(default)]
    pub content: String,
    /// Truncation ceiling in characters; `None` or zero disables truncation.
    #[serde(default)]
    pub max_chars: Option<usize>,
    /// Header text; may contain macros or an explicit leading `#`.
    #[serde(default)]
    pub title: Option<String>,
    /// Conditions that must match the compile context for inclusion.
    #[serde(default)]
    pub include_if: Option<Conditions>,
    /// Markdown header level (1-6, clamped) used for plain titles.
    #[serde(rename = "header_size", default = "default_header_level")]
    pub header_level: u8,
}

impl Section {
    /// Creates an empty section with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            max_chars: None,
            title: None,
            include_if: None,
            header_level: default_header_level(),
        }
    }

    /// Starts building a section from a payload or raw content.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(name)
    }

    /// Renders this section against an optional context.
    ///
    /// Trims the stored content, applies the `max_chars` ceiling (character
    /// count, with a trailing ellipsis), interpolates macros when a context is
    /// supplied (even an empty one), and prefixes the computed header. A
    /// section with a header but no content renders as the empty string; the
    /// compiler decides whether header-only placeholders appear.
    #[must_use]
    pub fn render(&self, context: Option<&Value>) -> String {
        let mut content = self.content.trim().to_owned();
        if let Some(max_chars) = self.max_chars {
            if max_chars > 0 && content.chars().count() > max_chars {
                let truncated: String = content.chars().take(max_chars).collect();
                content = format!("{}{ELLIPSIS}", truncated.trim_end());
            }
        }

        if let Some(context) = context {
            if content.contains("{{") {
                content = interpolate(&content, context);
            }
        }

        match self.header(context) {
            Some(header) => {
                if content.is_empty() {
                    String::new()
                } else {
                    format!("{header}\n{content}")
                }
            }
            None => content,
        }
    }

    /// Computes the header line, if any.
    ///
    /// The title is interpolated only when a context is supplied. A result
    /// whose left-trimmed text starts with `#` is used verbatim; otherwise a
    /// Markdown header at the clamped `header_level` is composed.
    pub(crate) fn header(&self, context: Option<&Value>) -> Option<String> {
        let title = self.title.as_deref()?;
        if title.is_empty() {
            return None;
        }

        let text = match context {
            Some(context) => interpolate(title, context),
            None => title.to_owned(),
        };
        if text.trim_start().starts_with('#') {
            return Some(text);
        }

        let level = usize::from(self.header_level.clamp(1, 6));
        Some(format!("{} {text}", "#".repeat(level)).trim().to_owned())
    }
}

/// Builder for [`Section`], mirroring the options accepted by
/// [`PromptBuilder::set_with`](crate::PromptBuilder::set_with).
#[derive(Debug)]
pub struct SectionBuilder {
    name: String,
    content: String,
    payload: Option<Value>,
    ordered: bool,
    max_chars: Option<usize>,
    title: Option<String>,
    include_if: Option<Conditions>,
    header_level: u8,
}

impl SectionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            payload: None,
            ordered: false,
            max_chars: None,
            title: None,
            include_if: None,
            header_level: default_header_level(),
        }
    }

    /// Sets raw content verbatim, bypassing payload coercion.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets a structured payload, coerced to text at [`build`](Self::build)
    /// time. Takes precedence over [`content`](Self::content).
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Renders sequence payloads with per-level numbering.
    #[must_use]
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    /// Sets the truncation ceiling in characters.
    #[must_use]
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Sets the header text.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the inclusion conditions.
    #[must_use]
    pub fn include_if(mut self, conditions: Conditions) -> Self {
        self.include_if = Some(conditions);
        self
    }

    /// Sets the Markdown header level used for plain titles.
    #[must_use]
    pub fn header_level(mut self, level: u8) -> Self {
        self.header_level = level;
        self
    }

    /// Builds the section, coercing any payload to stored text.
    #[must_use]
    pub fn build(self) -> Section {
        let content = match &self.payload {
            Some(payload) => coerce_payload(payload, self.ordered),
            None => self.content,
        };
        Section {
            name: self.name,
            content,
            max_chars: self.max_chars,
            title: self.title,
            include_if: self.include_if,
            header_level: self.header_level,
        }
    }
}

/// Options accepted by the `set`/`append` family on
/// [`PromptBuilder`](crate::PromptBuilder).
#[derive(Clone, Debug)]
pub struct SectionOptions {
    /// Header text for the section.
    pub title: Option<String>,
    /// Truncation ceiling in characters.
    pub max_chars: Option<usize>,
    /// Render sequence payloads with per-level numbering.
    pub ordered: bool,
    /// Conditions that must match the compile context for inclusion.
    pub include_if: Option<Conditions>,
    /// Markdown header level (1-6, clamped) for plain titles.
    pub header_level: u8,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            title: None,
            max_chars: None,
            ordered: false,
            include_if: None,
            header_level: default_header_level(),
        }
    }
}
