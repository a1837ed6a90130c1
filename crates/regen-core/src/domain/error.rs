// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried through reports and retries)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid generator declaration: {0}")]
    InvalidGenerator(String),

    #[error("Generator name must not be empty")]
    EmptyGeneratorName,

    #[error("Generator '{name}' is declared more than once")]
    DuplicateGenerator { name: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path '{path}' would escape the project root")]
    ParentDirNotAllowed { path: String },

    #[error("Unknown file kind '{value}'")]
    UnknownFileKind { value: String },

    // ========================================================================
    // Selector Errors
    // ========================================================================
    #[error("Unknown configuration key '{path}'")]
    UnknownSelector { path: String },

    #[error("Configuration key '{path}' expects {expected}, got {found}")]
    SelectorTypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("Configuration key '{path}' is read-only")]
    ReadOnlySelector { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidGenerator(msg) => vec![
                "Check the generators section of .regen/project.yml".into(),
                format!("Details: {}", msg),
            ],
            Self::EmptyGeneratorName => vec!["Give every generator a non-empty `name`".into()],
            Self::DuplicateGenerator { name } => vec![
                format!("Rename one of the generators called '{}'", name),
                "Generator names key the persisted reports and must be unique".into(),
            ],
            Self::AbsolutePathNotAllowed { path } => vec![
                format!("Make '{}' relative to the project root", path),
            ],
            Self::ParentDirNotAllowed { path } => vec![
                format!("Remove the `..` components from '{}'", path),
                "Destinations and origins must stay inside their root directory".into(),
            ],
            Self::UnknownFileKind { .. } => vec![
                "Valid kinds: copy, core-part, full-gen, skeleton".into(),
            ],
            Self::UnknownSelector { path } => vec![
                format!("'{}' is not a known configuration key", path),
                "List keys with: regen config list".into(),
                "Free-form values live under `vars.<name>`".into(),
            ],
            Self::SelectorTypeMismatch { expected, .. } => {
                vec![format!("Provide a value of type {}", expected)]
            }
            Self::ReadOnlySelector { .. } => {
                vec!["Edit .regen/project.yml directly to change this value".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSelector { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
