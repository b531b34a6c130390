//! Dotted-path lookup into nested mappings.

use crate::value::Value;

/// Resolves a dotted path such as `user.locale` against nested mapping data.
///
/// Walks one segment at a time; every intermediate step must be a mapping
/// containing the segment as a key. A missing key or a non-mapping step yields
/// `None` (absence), which is distinct from a present [`Value::Null`]. An
/// empty path looks up the empty-string key.
///
/// # Examples
///
/// ```
/// use prompt_model::{Value, resolve_path};
///
/// let data = Value::from_iter([("user", Value::from_iter([("locale", "pt-BR")]))]);
/// assert_eq!(resolve_path("user.locale", &data), Some(&Value::from("pt-BR")));
/// assert_eq!(resolve_path("user.missing", &data), None);
/// ```
#[must_use]
pub fn resolve_path<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_mapping()?.get(segment)?;
    }
    Some(current)
}
