//! Tool configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it. Project settings
//! are a different thing and live in `.regen/project.yml`.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `REGEN_*` environment variables (`REGEN_OUTPUT__NO_COLOR=true`)
//! 3. Config file (`--config`, or `config.toml` in the user config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use regen_core::domain::DEFAULT_WATCH_DELAY;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project: ProjectConfig,
    pub output: OutputConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root used when `--project` is not given.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub default_delay_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            default_delay_ms: DEFAULT_WATCH_DELAY.as_millis() as u64,
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    /// Absent keys fall back to the `Default` impls.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix("REGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.regen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "regen", "regen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".regen.toml"))
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.watch.default_delay_ms)
    }

    /// `--project`, then `project.path`, then the current directory.
    pub fn project_root(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.project.path.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_watch_delay() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.default_delay(), DEFAULT_WATCH_DELAY);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_optional_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(cfg.output.format, "human");
        assert_eq!(cfg.project.path, None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[output]\nno_color = true\n\n[watch]\ndefault_delay_ms = 750\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path, true).unwrap();
        assert!(cfg.output.no_color);
        assert_eq!(cfg.output.format, "human");
        assert_eq!(cfg.default_delay(), Duration::from_millis(750));
    }

    #[test]
    fn project_flag_wins_over_config() {
        let cfg = AppConfig {
            project: ProjectConfig {
                path: Some("/configured".into()),
            },
            ..AppConfig::default()
        };
        assert_eq!(cfg.project_root(Some(Path::new("/flag"))), PathBuf::from("/flag"));
        assert_eq!(cfg.project_root(None), PathBuf::from("/configured"));
        assert_eq!(AppConfig::default().project_root(None), PathBuf::from("."));
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
