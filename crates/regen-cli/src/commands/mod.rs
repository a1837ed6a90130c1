//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod report;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use regen_adapters::{ProjectLoader, local_ports};
use regen_core::application::GenerationService;
use tracing::debug;

use crate::{cli::GlobalArgs, config::AppConfig, error::CliResult, output::OutputManager};

/// A loaded project ready to generate.
pub struct OpenProject {
    pub loader: ProjectLoader,
    pub service: Arc<GenerationService>,
}

/// Resolve the project root and load its project file.
pub fn loader(global: &GlobalArgs, config: &AppConfig) -> ProjectLoader {
    let root = config.project_root(global.project.as_deref());
    ProjectLoader::new(root).with_default_delay(config.default_delay())
}

/// Load the project and wire it to the local adapters. A missing project
/// file is not an error; the user is told how to create one.
pub fn open(
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<OpenProject> {
    open_with(loader(global, config), output)
}

pub fn open_with(loader: ProjectLoader, output: &OutputManager) -> CliResult<OpenProject> {
    if !loader.exists() {
        output.warning(&format!(
            "No project file at {}; using defaults. Create one with: regen init",
            loader.project_file().display()
        ))?;
    }

    let project = loader.load()?;
    let root: PathBuf = loader.root().to_path_buf();
    debug!(root = %root.display(), generators = project.generators.len(), "project loaded");

    let ports = local_ports(&root, &project.templates);
    let service = GenerationService::new(project, root, ports)?;
    Ok(OpenProject {
        loader,
        service: Arc::new(service),
    })
}
