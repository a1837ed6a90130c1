//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the generator engine needs from the outside
//! world. The `regen-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{RelativePath, Report};
use crate::error::RegenResult;

/// Port for filesystem operations on the project tree.
///
/// Implemented by:
/// - `regen_adapters::filesystem::LocalFilesystem` (production)
/// - `regen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> RegenResult<()>;

    /// Write bytes to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &[u8]) -> RegenResult<()>;

    fn read_file(&self, path: &Path) -> RegenResult<Vec<u8>>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Every regular file at or below `path`, in a stable sorted order.
    /// A file path yields itself.
    fn walk_files(&self, path: &Path) -> RegenResult<Vec<PathBuf>>;
}

/// Shape of an origin inside a template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    File,
    Directory,
}

/// Port for reading generator origins (template bodies and literal assets).
///
/// Implemented by:
/// - `regen_adapters::template_source::DirectoryTemplateSource` (production)
/// - `regen_adapters::template_source::InMemoryTemplateSource` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource: Send + Sync {
    /// Errors with `ApplicationError::OriginNotFound` when absent.
    fn kind(&self, origin: &RelativePath) -> RegenResult<OriginKind>;

    fn read(&self, origin: &RelativePath) -> RegenResult<Vec<u8>>;

    /// Files below a directory origin, relative to it, sorted.
    fn list_files(&self, origin: &RelativePath) -> RegenResult<Vec<RelativePath>>;
}

/// Port for persisted generator reports, keyed by generator name.
#[cfg_attr(test, mockall::automock)]
pub trait ReportStore: Send + Sync {
    /// `Ok(None)` when the generator has never been persisted.
    fn load(&self, generator: &str) -> RegenResult<Option<Report>>;

    fn save(&self, generator: &str, report: &Report) -> RegenResult<()>;
}

/// Port for template rendering.
///
/// Implementations must offer the helpers listed in
/// [`crate::domain::naming::HELPER_NAMES`].
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Parse `source` and execute it against `context`. `name` is used in
    /// error messages only.
    fn render(&self, name: &str, source: &str, context: &Value) -> RegenResult<String>;
}

/// Port for canonical source formatting of rendered output.
#[cfg_attr(test, mockall::automock)]
pub trait SourceFormatter: Send + Sync {
    fn handles(&self, path: &Path) -> bool;

    fn format(&self, source: &str) -> RegenResult<String>;
}

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Port for running shell commands from watch tasks.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Errors only when the command cannot be started; a non-zero exit is
    /// reported through [`CommandOutput::success`].
    fn run(&self, command: &str, workdir: &Path) -> RegenResult<CommandOutput>;
}
