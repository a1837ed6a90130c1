//! `regen watch`: run every declared watch root until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use regen_adapters::{ShellCommandRunner, watch::WatchSupervisor};
use regen_core::application::CommandRunner;
use tracing::{info, instrument};

use crate::{
    cli::{GlobalArgs, WatchArgs},
    commands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: WatchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut loader = commands::loader(&global, &config);
    if let Some(ms) = args.delay_ms {
        loader = loader.with_default_delay(Duration::from_millis(ms));
    }
    let project = commands::open_with(loader, &output)?;

    if project.service.project().watches.is_empty() {
        return Err(CliError::NothingToWatch {
            project_file: project.loader.project_file(),
        });
    }

    let runner: Arc<dyn CommandRunner> = Arc::new(ShellCommandRunner::new());
    let supervisor = WatchSupervisor::from_project(Arc::clone(&project.service), runner)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("regen-watch")
        .build()
        .with_cli_context(|| "failed to start the async runtime")?;

    runtime.block_on(async {
        let handle = supervisor.spawn()?;
        for root in handle.roots() {
            output.info(&format!("Watching {}", root.display()))?;
        }
        output.print("Press Ctrl-C to stop")?;

        let signal = tokio::signal::ctrl_c().await;
        info!("stopping watchers");
        handle.shutdown();
        handle.join().await;

        signal.with_cli_context(|| "failed to listen for Ctrl-C")?;
        output.success("Stopped")?;
        Ok::<(), CliError>(())
    })
}
