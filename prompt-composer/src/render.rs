//! Nested payload rendering with per-level list numbering.
//!
//! Payloads render as indented bullet lines: two spaces per nesting level,
//! `-` bullets by default, `1.`/`2.`/... when ordered. Numbering restarts at
//! 1 at every nesting level; it never runs on across levels.

use prompt_model::{Mapping, Value};

/// Bullet label for the 1-based `index` at one level.
fn bullet(index: usize, ordered: bool) -> String {
    if ordered { format!("{index}.") } else { "-".to_owned() }
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// Stable string-form ordering for set payloads.
fn sort_for_display(items: &[Value]) -> Vec<Value> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(std::string::ToString::to_string);
    sorted
}

/// Renders a payload into indented bullet lines starting at `level`.
///
/// Mappings render each entry as a labeled sibling; sequences dispatch per
/// item (see [`render_sequence`]'s cases in order); sets sort by string form
/// first; scalars become a single bulleted line.
#[must_use]
pub fn render_lines(value: &Value, level: usize, ordered: bool) -> Vec<String> {
    match value {
        Value::String(text) => {
            vec![format!("{}{} {}", indent(level), bullet(1, ordered), text.trim())]
        }
        Value::Mapping(entries) => render_mapping(entries, level, ordered),
        Value::Sequence(items) => render_sequence(items, level, ordered),
        Value::Set(items) => render_sequence(&sort_for_display(items), level, ordered),
        scalar => {
            let text = scalar.to_string();
            vec![format!("{}{} {}", indent(level), bullet(1, ordered), text.trim())]
        }
    }
}

/// Renders a mapping's entries as labeled siblings at `level`.
fn render_mapping(entries: &Mapping, level: usize, ordered: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let pad = indent(level);
    for (index, (key, value)) in entries.iter().enumerate() {
        let label = bullet(index + 1, ordered);
        let key = key.trim();
        if value.is_nested() {
            lines.push(format!("{pad}{label} {key}"));
            lines.extend(render_lines(value, level + 1, ordered));
        } else if value.is_null() {
            lines.push(format!("{pad}{label} {key}"));
        } else {
            lines.push(format!("{pad}{label} {key}: {}", value.to_string().trim()));
        }
    }
    lines
}

/// Renders sequence items at `level`. Item dispatch, in order:
///
/// 1. single-key mapping: the sole key labels its children
/// 2. sequence led by a string: a `[label, children]` pair (extra elements
///    beyond the children slot are ignored)
/// 3. any other mapping: anonymous bullet, entries as children
/// 4. nested sequence or set: anonymous bullet, items as children
/// 5. scalar: one bulleted line; blank scalars are skipped
fn render_sequence(items: &[Value], level: usize, ordered: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let pad = indent(level);
    for (index, item) in items.iter().enumerate() {
        let label = bullet(index + 1, ordered);
        match item {
            Value::Mapping(entries) if entries.len() == 1 => {
                if let Some((key, value)) = entries.first() {
                    let key = key.trim();
                    if value.is_nested() {
                        lines.push(format!("{pad}{label} {key}"));
                        lines.extend(render_lines(value, level + 1, ordered));
                    } else if value.is_null() {
                        lines.push(format!("{pad}{label} {key}"));
                    } else {
                        lines.push(format!("{pad}{label} {key}: {}", value.to_string().trim()));
                    }
                }
            }
            Value::Sequence(pair) if matches!(pair.first(), Some(Value::String(_))) => {
                if let Some(Value::String(text)) = pair.first() {
                    lines.push(format!("{pad}{label} {}", text.trim()));
                }
                match pair.get(1) {
                    Some(children) if children.is_nested() => {
                        lines.extend(render_lines(children, level + 1, ordered));
                    }
                    Some(Value::Null) | None => {}
                    Some(child) => {
                        lines.push(format!(
                            "{}{} {}",
                            indent(level + 1),
                            bullet(1, ordered),
                            child.to_string().trim()
                        ));
                    }
                }
            }
            Value::Mapping(entries) => {
                lines.push(format!("{pad}{label}"));
                lines.extend(render_mapping(entries, level + 1, ordered));
            }
            Value::Sequence(nested) => {
                lines.push(format!("{pad}{label}"));
                lines.extend(render_sequence(nested, level + 1, ordered));
            }
            Value::Set(nested) => {
                lines.push(format!("{pad}{label}"));
                lines.extend(render_sequence(&sort_for_display(nested), level + 1, ordered));
            }
            scalar => {
                let text = scalar.to_string();
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(format!("{pad}{label} {text}"));
                }
            }
        }
    }
    lines
}

/// Coerces any accepted payload into stored section text.
///
/// Strings are trimmed with runs of three or more newlines collapsed to two;
/// nested payloads become joined [`render_lines`] output; remaining scalars
/// use their trimmed string form. Coercion happens once, at assignment time.
#[must_use]
pub fn coerce_payload(value: &Value, ordered: bool) -> String {
    match value {
        Value::String(text) => collapse_blank_lines(text.trim()),
        nested if nested.is_nested() => render_lines(nested, 0, ordered).join("\n"),
        scalar => {
            let text = scalar.to_string();
            text.trim().to_owned()
        }
    }
}

/// Caps runs of consecutive newlines at two.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run <= 2 {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out
}
