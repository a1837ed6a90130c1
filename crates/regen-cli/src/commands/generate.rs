//! `regen gen`: run generators and persist their reports.

use regen_core::application::GenerateOutcome;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    cli::{GenArgs, GlobalArgs, OutputFormat},
    commands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Per-generator result, also the JSON output shape.
#[derive(Debug, Serialize)]
struct RunSummary {
    generator: String,
    written: usize,
    failures: Vec<FailureLine>,
    aborted: bool,
}

#[derive(Debug, Serialize)]
struct FailureLine {
    path: String,
    reason: String,
}

#[instrument(skip_all)]
pub fn execute(
    args: GenArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = commands::open(&global, &config, &output)?;
    let service = &project.service;

    let requested = if args.all { Vec::new() } else { args.names };
    let names = service.resolve_names(&requested)?;
    if names.is_empty() {
        output.warning("No generators declared")?;
        return Ok(());
    }

    let bar = output.progress(names.len() as u64);
    let mut summaries = Vec::with_capacity(names.len());
    for name in &names {
        bar.set_message(name.clone());
        let outcome = service.generate(name)?;
        summaries.push(summarize(name, outcome));
        bar.inc(1);
    }
    bar.finish_and_clear();

    if output.format() == OutputFormat::Json {
        output.json(&summaries)?;
    } else {
        for summary in &summaries {
            print_summary(&output, summary)?;
        }
    }

    let failed: Vec<String> = summaries
        .iter()
        .filter(|s| s.aborted || !s.failures.is_empty())
        .map(|s| s.generator.clone())
        .collect();
    info!(ran = summaries.len(), failed = failed.len(), "generation finished");

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::GenerationIncomplete { failed })
    }
}

fn summarize(name: &str, outcome: GenerateOutcome) -> RunSummary {
    match outcome {
        GenerateOutcome::Completed { written, failures } => RunSummary {
            generator: name.to_string(),
            written,
            failures: failures
                .into_iter()
                .map(|f| FailureLine {
                    path: f.path.to_slash_string(),
                    reason: f.reason,
                })
                .collect(),
            aborted: false,
        },
        GenerateOutcome::Aborted { expected, got } => RunSummary {
            generator: name.to_string(),
            written: 0,
            failures: vec![FailureLine {
                path: String::new(),
                reason: format!("{got} contexts for {expected} declared files"),
            }],
            aborted: true,
        },
    }
}

fn print_summary(output: &OutputManager, summary: &RunSummary) -> CliResult<()> {
    if summary.aborted {
        let reason = summary
            .failures
            .first()
            .map(|f| f.reason.as_str())
            .unwrap_or_default();
        output.error(&format!("{}: aborted, nothing written ({reason})", summary.generator))?;
        return Ok(());
    }

    if summary.failures.is_empty() {
        output.success(&format!("{}: {} file(s) written", summary.generator, summary.written))?;
        return Ok(());
    }

    output.warning(&format!(
        "{}: {} file(s) written, {} skipped",
        summary.generator,
        summary.written,
        summary.failures.len()
    ))?;
    for failure in &summary.failures {
        output.print(&format!("    {}: {}", failure.path, failure.reason))?;
    }
    Ok(())
}
