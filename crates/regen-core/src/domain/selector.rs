//! Typed access to configuration fields by dotted path.
//!
//! A configuration type lists its addressable fields once, as a static table
//! of [`Selector`]s. Snapshots, `config get` and `config set` all go through
//! that table, so an unknown path is a lookup miss rather than a runtime
//! traversal of arbitrary structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

pub type Getter<C> = fn(&C) -> Option<Value>;
pub type Setter<C> = fn(&mut C, Value) -> Result<(), DomainError>;

/// One addressable field of a configuration type.
pub struct Selector<C: 'static> {
    pub path: &'static str,
    pub get: Getter<C>,
    /// `None` for read-only paths such as whole sub-objects.
    pub set: Option<Setter<C>>,
}

/// A configuration type that exposes its fields through a selector table.
pub trait SelectorSource: Sized + 'static {
    fn selectors() -> &'static [Selector<Self>];

    /// Resolve paths the static table cannot list, such as map entries.
    fn resolve_dynamic(&self, _path: &str) -> Option<Value> {
        None
    }

    fn assign_dynamic(&mut self, path: &str, _value: Value) -> Result<(), DomainError> {
        Err(DomainError::UnknownSelector {
            path: path.to_string(),
        })
    }

    fn resolve(&self, path: &str) -> Option<Value> {
        match Self::selectors().iter().find(|s| s.path == path) {
            Some(selector) => (selector.get)(self),
            None => self.resolve_dynamic(path),
        }
    }

    fn assign(&mut self, path: &str, value: Value) -> Result<(), DomainError> {
        match Self::selectors().iter().find(|s| s.path == path) {
            Some(Selector { set: Some(set), .. }) => set(self, value),
            Some(Selector { set: None, .. }) => Err(DomainError::ReadOnlySelector {
                path: path.to_string(),
            }),
            None => self.assign_dynamic(path, value),
        }
    }

    /// Flatten the given paths into a snapshot. Unresolvable paths are
    /// left out.
    fn snapshot<S: AsRef<str>>(&self, paths: &[S]) -> ConfigSnapshot {
        let mut snapshot = ConfigSnapshot::default();
        for path in paths {
            let path = path.as_ref();
            if let Some(value) = self.resolve(path) {
                snapshot.insert(path, value);
            }
        }
        snapshot
    }

    fn known_paths() -> Vec<&'static str> {
        Self::selectors().iter().map(|s| s.path).collect()
    }
}

/// Selector path → value, compared structurally.
///
/// Backed by a sorted map so insertion order never affects equality, and by
/// `serde_json::Value` so nested arrays and objects compare element by
/// element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSnapshot(BTreeMap<String, Value>);

impl ConfigSnapshot {
    pub fn insert(&mut self, path: impl Into<String>, value: Value) {
        self.0.insert(path.into(), value);
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.0.get(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── value coercion for setters ───────────────────────────────────────────────

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "a boolean".into(),
        Value::Number(_) => "a number".into(),
        Value::String(_) => "a string".into(),
        Value::Array(_) => "an array".into(),
        Value::Object(_) => "an object".into(),
    }
}

fn mismatch(path: &str, expected: &'static str, value: &Value) -> DomainError {
    DomainError::SelectorTypeMismatch {
        path: path.to_string(),
        expected,
        found: describe(value),
    }
}

pub fn expect_string(path: &str, value: Value) -> Result<String, DomainError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(mismatch(path, "a string", &other)),
    }
}

pub fn expect_bool(path: &str, value: Value) -> Result<bool, DomainError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(path, "a boolean", &other)),
    }
}

pub fn expect_port(path: &str, value: Value) -> Result<u16, DomainError> {
    value
        .as_u64()
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| mismatch(path, "a port number (0-65535)", &value))
}
