//! Identifier helpers exposed to template authors.
//!
//! Every function here is pure and works on exact literal prefixes and
//! suffixes; only the first character is ever case-mapped. Renderer adapters
//! register them under the names in [`HELPER_NAMES`].

use serde_json::{Map, Value};

/// Stable helper names as seen from templates.
pub const HELPER_NAMES: [&str; 6] = [
    "Upper",
    "TrimPluralization",
    "IsNotPlural",
    "TrimNewPrefix",
    "KeyExist",
    "CamelToSnake",
];

const PLURAL_SUFFIX: &str = "_plural";
const SINGULAR_SUFFIX: &str = "_singular";

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip a trailing `_plural` or `_singular`.
pub fn trim_pluralization(s: &str) -> &str {
    s.strip_suffix(PLURAL_SUFFIX)
        .or_else(|| s.strip_suffix(SINGULAR_SUFFIX))
        .unwrap_or(s)
}

pub fn is_not_plural(s: &str) -> bool {
    !s.ends_with(PLURAL_SUFFIX)
}

/// Strip a leading `new`, then a leading `New`, for strings of at least
/// three bytes. Shorter strings come back unchanged.
pub fn trim_new_prefix(s: &str) -> &str {
    if s.len() < 3 {
        return s;
    }
    let s = s.strip_prefix("new").unwrap_or(s);
    s.strip_prefix("New").unwrap_or(s)
}

/// Whether `key` is present in a template data object.
pub fn key_exists(key: &str, map: &Map<String, Value>) -> bool {
    map.contains_key(key)
}

/// `HTTPServerConfig` → `http_server_config`.
///
/// A boundary is placed before an uppercase letter that follows a lowercase
/// letter or digit, and before the last capital of an acronym run that is
/// followed by a lowercase letter.
pub fn camel_to_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && prev != '_' {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}
