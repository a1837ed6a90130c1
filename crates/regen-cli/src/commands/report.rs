//! `regen report`: show drift since the last generation.

use tracing::instrument;

use crate::{
    cli::{GlobalArgs, OutputFormat, ReportArgs},
    commands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: ReportArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = commands::open(&global, &config, &output)?;
    let service = &project.service;

    let reports = service
        .resolve_names(&args.names)?
        .iter()
        .map(|name| service.report(name))
        .collect::<Result<Vec<_>, _>>()?;

    if output.format() == OutputFormat::Json {
        output.json(&reports)?;
        return Ok(());
    }

    if reports.is_empty() {
        output.warning("No generators declared")?;
        return Ok(());
    }

    for (index, report) in reports.iter().enumerate() {
        if index > 0 {
            output.data("")?;
        }
        output.drift(report)?;
    }

    let drifted = reports.iter().filter(|r| !r.is_clean()).count();
    if drifted == 0 {
        output.success("Everything is up to date")?;
    } else {
        output.info(&format!("{drifted} generator(s) could be re-run"))?;
    }
    Ok(())
}
