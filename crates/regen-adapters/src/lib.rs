//! Infrastructure adapters for regen.
//!
//! This crate implements the ports defined in `regen_core::application::ports`
//! and owns every I/O concern: the project file, report persistence,
//! template rendering, shell commands and filesystem watching.

pub mod builtin_project;
pub mod command;
pub mod filesystem;
pub mod formatter;
pub mod project_loader;
pub mod renderer;
pub mod report_store;
pub mod template_source;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use regen_core::{application::GeneratorPorts, domain::RelativePath};

// Re-export commonly used adapters
pub use command::ShellCommandRunner;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use formatter::RustfmtFormatter;
pub use project_loader::{PROJECT_FILE, ProjectLoader};
pub use renderer::HandlebarsRenderer;
pub use report_store::{InMemoryReportStore, YamlReportStore};
pub use template_source::{DirectoryTemplateSource, InMemoryTemplateSource};

/// Ports backed by the local disk for a project rooted at `project_root`.
pub fn local_ports(project_root: &Path, templates: &RelativePath) -> GeneratorPorts {
    GeneratorPorts {
        filesystem: Arc::new(LocalFilesystem::new()),
        templates: Arc::new(DirectoryTemplateSource::new(templates.under(project_root))),
        reports: Arc::new(YamlReportStore::new(project_root)),
        renderer: Arc::new(HandlebarsRenderer::new()),
        formatter: Some(Arc::new(RustfmtFormatter::new())),
    }
}
