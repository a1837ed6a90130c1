//! `regen init`: write the starter project.

use std::path::Path;

use regen_adapters::{LocalFilesystem, builtin_project};
use tracing::info;

use crate::{
    cli::{GlobalArgs, InitArgs},
    commands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let loader = commands::loader(&global, &config);
    let root = loader.root().to_path_buf();

    let mut force = args.force;
    if loader.exists() && !force {
        if args.yes || global.quiet {
            output.info("Project file exists; keeping existing files")?;
        } else if confirm_overwrite(&loader.project_file())? {
            force = true;
        }
    }

    output.info(&format!("Initialising project in {}", root.display()))?;
    let summary = builtin_project::install(&LocalFilesystem::new(), &root, force)?;
    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        "starter project installed"
    );

    for path in &summary.written {
        output.print(&format!("  created {}", relative(path, &root)))?;
    }
    if !summary.skipped.is_empty() {
        output.warning(&format!(
            "{} existing file(s) kept (use --force to overwrite)",
            summary.skipped.len()
        ))?;
    }

    output.success(&format!("Project ready at {}", loader.project_file().display()))?;
    output.print("Next: regen gen --all && regen report")?;
    Ok(())
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Ask before overwriting. Without a terminal the answer is "no".
#[cfg(feature = "interactive")]
fn confirm_overwrite(project_file: &Path) -> CliResult<bool> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} already exists. Overwrite the starter files?",
            project_file.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            other => CliError::InvalidInput {
                message: "could not read confirmation".into(),
                source: Some(Box::new(other)),
            },
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_project_file: &Path) -> CliResult<bool> {
    Ok(false)
}
