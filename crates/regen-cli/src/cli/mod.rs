//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "regen",
    bin_name = "regen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{267b} Incremental project generation",
    long_about = "regen re-runs declared generators over a project, reports \
                  which generated files drifted from their last run, and \
                  regenerates live while you edit.",
    after_help = "EXAMPLES:\n\
        \x20 regen init\n\
        \x20 regen gen --all\n\
        \x20 regen report base\n\
        \x20 regen watch -v\n\
        \x20 regen completions bash > /usr/share/bash-completion/completions/regen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter project.
    #[command(
        about = "Create a starter .regen project",
        after_help = "EXAMPLES:\n\
            \x20 regen init\n\
            \x20 regen init --force    # overwrite existing starter files\n\
            \x20 regen -p ../site init"
    )]
    Init(InitArgs),

    /// Run generators.
    #[command(
        visible_alias = "g",
        about = "Run generators",
        after_help = "EXAMPLES:\n\
            \x20 regen gen base\n\
            \x20 regen gen base pages\n\
            \x20 regen gen --all"
    )]
    Gen(GenArgs),

    /// Show drift since the last run.
    #[command(
        visible_alias = "r",
        about = "Report drift since the last generation",
        after_help = "EXAMPLES:\n\
            \x20 regen report\n\
            \x20 regen report base\n\
            \x20 regen --output-format json report"
    )]
    Report(ReportArgs),

    /// Watch declared roots and regenerate on change.
    #[command(
        visible_alias = "w",
        about = "Watch roots and run their actions on change",
        after_help = "EXAMPLES:\n\
            \x20 regen watch\n\
            \x20 regen watch --delay-ms 500"
    )]
    Watch(WatchArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 regen completions bash > ~/.local/share/bash-completion/completions/regen\n\
            \x20 regen completions zsh  > ~/.zfunc/_regen\n\
            \x20 regen completions fish > ~/.config/fish/completions/regen.fish"
    )]
    Completions(CompletionsArgs),

    /// Read and write project settings.
    #[command(
        about = "Project settings",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 regen config get dev.port\n\
            \x20 regen config set dev.port 9000\n\
            \x20 regen config set vars.pages '[{title: Home}]'\n\
            \x20 regen config list"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `regen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite starter files that already exist.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Never prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
    pub yes: bool,
}

// ── gen ───────────────────────────────────────────────────────────────────────

/// Arguments for `regen gen`.
#[derive(Debug, Args)]
pub struct GenArgs {
    /// Generators to run, in the given order.
    #[arg(
        value_name = "NAME",
        required_unless_present = "all",
        conflicts_with = "all",
        help = "Generator names"
    )]
    pub names: Vec<String>,

    /// Run every declared generator in declaration order.
    #[arg(short = 'a', long = "all", help = "Run every generator")]
    pub all: bool,
}

// ── report ────────────────────────────────────────────────────────────────────

/// Arguments for `regen report`.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Generators to report on; all when omitted.
    #[arg(value_name = "NAME", help = "Generator names (default: all)")]
    pub names: Vec<String>,
}

// ── watch ─────────────────────────────────────────────────────────────────────

/// Arguments for `regen watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Debounce delay for watch entries without their own `delay_ms`.
    #[arg(
        long = "delay-ms",
        value_name = "MS",
        help = "Default debounce delay in milliseconds"
    )]
    pub delay_ms: Option<u64>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `regen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `regen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a settings key.
    Get {
        /// Dotted key, e.g. `dev.port` or `vars.pages`.
        key: String,
    },
    /// Set a settings key. The value is parsed as YAML.
    Set {
        /// Dotted key.
        key: String,
        /// New value, e.g. `9000`, `true` or `'[a, b]'`.
        value: String,
    },
    /// Print every settings key with its value.
    List,
    /// Print the configuration and project file paths.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
