//! Mustache-like `{{path}}` interpolation with `{{{literal}}}` protection.

use prompt_model::{Value, resolve_path};

/// Substitutes `{{path}}` spans in `text` with values resolved from `context`.
///
/// Keys are dotted paths, whitespace-trimmed, resolved via [`resolve_path`].
/// A span whose key resolves to a present, non-null value is replaced by the
/// value's string form; anything else is left as literal text. Triple-brace
/// spans (`{{{ ... }}}`, which may cross newlines) lose their delimiters but
/// keep their inner text verbatim, even when that text looks like a macro.
///
/// Malformed or unmatched delimiters never error; they pass through as
/// literal text. Re-running the result substitutes nothing new as long as the
/// remaining spans still fail to resolve.
///
/// # Examples
///
/// ```
/// use prompt_composer::interpolate;
/// use prompt_model::Value;
///
/// let context = Value::from_iter([("user", Value::from_iter([("lang", "pt-BR")]))]);
/// assert_eq!(interpolate("Use {{user.lang}}.", &context), "Use pt-BR.");
/// assert_eq!(interpolate("{{{ {{user.lang}} }}}", &context), " {{user.lang}} ");
/// assert_eq!(interpolate("{{unknown}}", &context), "{{unknown}}");
/// ```
#[must_use]
pub fn interpolate(text: &str, context: &Value) -> String {
    if !text.contains("{{") {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix("{{{") {
            if let Some(end) = inner.find("}}}") {
                out.push_str(&inner[..end]);
                rest = &inner[end + 3..];
                continue;
            }
            // No closing triple: fall through so `{{x}}` inside still resolves.
        }
        if rest.starts_with("{{") {
            if let Some(consumed) = substitute_span(rest, context, &mut out) {
                rest = &rest[consumed..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
            rest = chars.as_str();
        }
    }
    out
}

/// Consumes one `{{ key }}` span at the start of `span`, appending either the
/// resolved value or the untouched span text. Returns the consumed length, or
/// `None` when no well-formed span starts here.
fn substitute_span(span: &str, context: &Value, out: &mut String) -> Option<usize> {
    let body = &span[2..];
    let close = body.find("}}")?;
    let raw_key = &body[..close];
    if raw_key.is_empty() || raw_key.contains(['{', '}']) {
        return None;
    }

    let consumed = close + 4;
    match resolve_path(raw_key.trim(), context) {
        Some(value) if !value.is_null() => out.push_str(&value.to_string()),
        _ => out.push_str(&span[..consumed]),
    }
    Some(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Value {
        Value::from_iter([
            ("name", Value::from("Ada")),
            ("user", Value::from_iter([("lang", "pt-BR")])),
            ("nothing", Value::Null),
        ])
    }

    #[test]
    fn substitutes_dotted_paths() {
        assert_eq!(
            interpolate("Hello {{name}}, use {{ user.lang }}.", &context()),
            "Hello Ada, use pt-BR."
        );
    }

    #[test]
    fn unresolved_keys_stay_literal() {
        assert_eq!(interpolate("Hi {{missing.key}}!", &context()), "Hi {{missing.key}}!");
    }

    #[test]
    fn null_values_stay_literal() {
        assert_eq!(interpolate("{{nothing}}", &context()), "{{nothing}}");
    }

    #[test]
    fn triple_braces_protect_inner_text() {
        assert_eq!(
            interpolate("Literal: {{{ {{name}} }}}", &context()),
            "Literal:  {{name}} "
        );
    }

    #[test]
    fn protected_spans_may_cross_newlines() {
        assert_eq!(interpolate("{{{a\n{{name}}\nb}}}", &context()), "a\n{{name}}\nb");
    }

    #[test]
    fn unmatched_delimiters_pass_through() {
        assert_eq!(interpolate("open {{name", &context()), "open {{name");
        assert_eq!(interpolate("{{a}b}}", &context()), "{{a}b}}");
        assert_eq!(interpolate("{{}}", &context()), "{{}}");
    }

    #[test]
    fn unterminated_triple_still_resolves_inner_double() {
        assert_eq!(interpolate("{{{name}}", &context()), "{Ada");
    }

    #[test]
    fn rerunning_is_idempotent_when_nothing_resolves() {
        let once = interpolate("{{missing}} and {{also.gone}}", &context());
        let twice = interpolate(&once, &context());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_text_passes_through() {
        assert_eq!(interpolate("", &context()), "");
        assert_eq!(interpolate("plain", &context()), "plain");
    }
}
