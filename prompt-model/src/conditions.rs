//! Inclusion predicates evaluated against a context mapping.

use indexmap::IndexMap;

use crate::path::resolve_path;
use crate::value::Value;

/// Condition mapping from dotted context paths to expected values.
///
/// Supported shapes:
/// - `{"user.locale": "pt-BR"}` requires exact equality
/// - `{"flags.beta": true}` requires truthiness (`false` requires falsiness)
/// - `{"user.role": ["admin", "owner"]}` is a membership test
pub type Conditions = IndexMap<String, Value>;

/// Evaluates every condition against the context, short-circuiting on the
/// first failure.
///
/// Empty conditions always match. Non-empty conditions with an absent context
/// never match (fail closed). An absent context value compares as
/// [`Value::Null`] in the equality and membership branches, so a `null`
/// expectation matches a missing path.
#[must_use]
pub fn conditions_match(conditions: &Conditions, context: Option<&Value>) -> bool {
    if conditions.is_empty() {
        return true;
    }
    let Some(context) = context else {
        return false;
    };

    conditions.iter().all(|(path, expected)| {
        let actual = resolve_path(path, context);
        match expected {
            Value::Sequence(options) | Value::Set(options) => {
                let actual = actual.unwrap_or(&Value::Null);
                options.iter().any(|candidate| candidate == actual)
            }
            Value::Bool(true) => actual.is_some_and(Value::is_truthy),
            Value::Bool(false) => !actual.is_some_and(Value::is_truthy),
            _ => actual.unwrap_or(&Value::Null) == expected,
        }
    })
}
