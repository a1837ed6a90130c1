//! Application layer errors.
//!
//! These errors represent failures at the ports (filesystem, template source,
//! renderer, report store, command runner), not rule violations. Rule
//! violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while driving the ports.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A declared origin does not exist in the template source.
    #[error("Template origin not found: {origin}")]
    OriginNotFound { origin: String },

    /// The template source could not be read.
    #[error("Template source error for {origin}: {reason}")]
    TemplateSource { origin: String, reason: String },

    /// Template parsing or execution failed.
    #[error("Template rendering failed for {template}: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// The canonical formatter rejected the rendered output.
    #[error("Formatter failed: {reason}")]
    FormattingFailed { reason: String },

    /// Loading or saving a persisted report failed.
    #[error("Report store error for generator '{generator}': {reason}")]
    ReportStore { generator: String, reason: String },

    /// The project file is missing required data or cannot be parsed.
    #[error("Invalid project file {path}: {reason}")]
    InvalidProjectFile { path: PathBuf, reason: String },

    /// A generator name was requested that the project does not declare.
    #[error("The generator {name} does not exist.")]
    UnknownGenerator { name: String, available: Vec<String> },

    /// An external command could not be started.
    #[error("Command failed: {command}: {reason}")]
    CommandFailed { command: String, reason: String },

    /// A watch root could not be set up.
    #[error("Cannot watch {root}: {reason}")]
    WatchFailed { root: PathBuf, reason: String },

    /// Shared adapter state is poisoned.
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::OriginNotFound { origin } => vec![
                format!("Create '{}' under the templates directory", origin),
                "Or fix the `origin` of the file in .regen/project.yml".into(),
            ],
            Self::InvalidProjectFile { path, .. } => vec![
                format!("Fix the syntax of {}", path.display()),
                "Recreate a starter project with: regen init --force".into(),
            ],
            Self::UnknownGenerator { available, .. } => {
                let mut out = vec!["Available generators:".to_string()];
                out.extend(available.iter().map(|name| format!("  • {}", name)));
                out.push("Run every generator with: regen gen --all".into());
                out
            }
            Self::CommandFailed { .. } => vec![
                "Ensure the command is installed and in your PATH".into(),
            ],
            Self::WatchFailed { root, .. } => vec![
                format!("Check that {} exists and is a directory", root.display()),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::OriginNotFound { .. } | Self::UnknownGenerator { .. } => ErrorCategory::NotFound,
            Self::InvalidProjectFile { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::TemplateSource { .. }
            | Self::RenderingFailed { .. }
            | Self::FormattingFailed { .. }
            | Self::ReportStore { .. }
            | Self::CommandFailed { .. }
            | Self::WatchFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
