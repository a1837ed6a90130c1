//! `regen config`: read and write project settings.

use regen_core::{
    domain::{DomainError, ProjectSettings, SelectorSource},
    error::RegenError,
};
use serde_json::Value;

use crate::{
    cli::{ConfigCommands, GlobalArgs, OutputFormat},
    commands,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let loader = commands::loader(&global, &config);

    match cmd {
        ConfigCommands::Get { key } => {
            let settings = loader.load()?.settings;
            let value = get_value(&settings, &key)?;
            if output.format() == OutputFormat::Json {
                output.json(&value)?;
            } else {
                output.data(&render(&value))?;
            }
        }

        ConfigCommands::Set { key, value } => {
            let mut settings = loader.load()?.settings;
            let parsed = parse_value(&value)?;
            set_value(&mut settings, &key, parsed)?;
            loader.save_settings(&settings)?;
            let stored = get_value(&settings, &key)?;
            output.success(&format!("{key} = {}", render(&stored)))?;
        }

        ConfigCommands::List => {
            let settings = loader.load()?.settings;
            let entries = list_values(&settings);
            if output.format() == OutputFormat::Json {
                let map: serde_json::Map<String, Value> = entries.into_iter().collect();
                output.json(&map)?;
            } else {
                output.header("Project settings:")?;
                for (key, value) in entries {
                    output.data(&format!("{key} = {}", render(&value)))?;
                }
            }
        }

        ConfigCommands::Path => {
            output.data(&format!("config:  {}", tool_config_path(&global).display()))?;
            output.data(&format!("project: {}", loader.project_file().display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn tool_config_path(global: &GlobalArgs) -> std::path::PathBuf {
    global.config.clone().unwrap_or_else(AppConfig::config_path)
}

fn get_value(settings: &ProjectSettings, key: &str) -> CliResult<Value> {
    settings.resolve(key).ok_or_else(|| {
        RegenError::from(DomainError::UnknownSelector {
            path: key.to_string(),
        })
        .into()
    })
}

fn set_value(settings: &mut ProjectSettings, key: &str, value: Value) -> CliResult<()> {
    settings.assign(key, value).map_err(RegenError::from)?;
    Ok(())
}

/// Parse a command-line value as YAML so `9000`, `true` and `[a, b]` keep
/// their types.
fn parse_value(raw: &str) -> CliResult<Value> {
    serde_yaml::from_str(raw).with_cli_context(|| format!("'{raw}' is not a valid YAML value"))
}

/// Every writable key in table order, then one line per `vars` entry.
fn list_values(settings: &ProjectSettings) -> Vec<(String, Value)> {
    let mut entries: Vec<(String, Value)> = ProjectSettings::selectors()
        .iter()
        .filter(|selector| selector.set.is_some())
        .filter_map(|selector| {
            (selector.get)(settings).map(|v| (selector.path.to_string(), v))
        })
        .collect();
    entries.extend(
        settings
            .vars
            .iter()
            .map(|(key, value)| (format!("vars.{key}"), value.clone())),
    );
    entries
}

/// Scalars print bare; structures print as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
