use serde_json::Value;

/// Data a generator's templates are executed against.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderContext {
    /// Every file sees the same value.
    Shared(Value),
    /// One value per declared file, matched by position.
    PerFile(Vec<Value>),
}

impl RenderContext {
    /// Build a context from a resolved value.
    ///
    /// Per-file mode only applies when the value is an array; anything else
    /// is shared.
    pub fn from_value(value: Value, per_file: bool) -> Self {
        match value {
            Value::Array(items) if per_file => Self::PerFile(items),
            other => Self::Shared(other),
        }
    }

    /// Context for the file at `index`.
    pub fn for_file(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Shared(value) => Some(value),
            Self::PerFile(items) => items.get(index),
        }
    }

    /// Number of per-file contexts, or `None` when shared.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Shared(_) => None,
            Self::PerFile(items) => Some(items.len()),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::Shared(Value::Null)
    }
}
