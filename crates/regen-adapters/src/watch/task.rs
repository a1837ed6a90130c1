//! Watch actions: what runs when a root settles.

use std::path::Path;
use std::sync::Arc;

use regen_core::{
    application::{CommandRunner, GenerationService},
    domain::WatchAction,
};
use tracing::{error, info, warn};

use super::dispatch::TaskFn;

/// Outcome of one watch action run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSummary {
    /// `None` when the action has no command.
    pub command_succeeded: Option<bool>,
    pub generated: Vec<String>,
    pub failed: Vec<String>,
}

/// Substitute `{path}` and `{project}` in a command template.
pub fn expand_command(template: &str, path: &Path, project: &Path) -> String {
    template
        .replace("{path}", &path.display().to_string())
        .replace("{project}", &project.display().to_string())
}

/// Run the command, then every listed generator in order. Failures are
/// logged and recorded; later steps still run.
pub fn run_action(
    action: &WatchAction,
    service: &GenerationService,
    runner: &dyn CommandRunner,
    path: &Path,
) -> ActionSummary {
    let mut summary = ActionSummary::default();
    let project = service.project_root();

    if let Some(template) = &action.command {
        let command = expand_command(template, path, project);
        let succeeded = match runner.run(&command, project) {
            Ok(output) if output.success => {
                info!(command = %command, "watch command succeeded");
                true
            }
            Ok(output) => {
                warn!(
                    command = %command,
                    status = ?output.status,
                    stderr = %output.stderr.trim(),
                    "watch command failed"
                );
                false
            }
            Err(e) => {
                error!(command = %command, error = %e, "watch command could not start");
                false
            }
        };
        summary.command_succeeded = Some(succeeded);
    }

    for name in &action.generate {
        match service.generate(name) {
            Ok(outcome) if outcome.is_success() => {
                summary.generated.push(name.clone());
            }
            Ok(outcome) => {
                warn!(generator = %name, ?outcome, "watch generation incomplete");
                summary.failed.push(name.clone());
            }
            Err(e) => {
                error!(generator = %name, error = %e, "watch generation failed");
                summary.failed.push(name.clone());
            }
        }
    }

    summary
}

/// Package an action as a dispatchable task.
pub fn watch_task(
    action: WatchAction,
    service: Arc<GenerationService>,
    runner: Arc<dyn CommandRunner>,
) -> TaskFn {
    Arc::new(move |path| {
        let summary = run_action(&action, &service, runner.as_ref(), &path);
        info!(
            path = %path.display(),
            generated = summary.generated.len(),
            failed = summary.failed.len(),
            "watch task finished"
        );
    })
}
