//! YAML report store: one file per generator under the project.

use std::path::{Path, PathBuf};

use regen_core::{
    application::{ApplicationError, ports::ReportStore},
    domain::Report,
    error::RegenResult,
};
use tracing::{debug, instrument};

/// Report directory, relative to the project root.
pub const REPORT_DIR: &str = ".regen/report";

/// Persists reports as `<project>/.regen/report/<name>_report.yml`.
#[derive(Debug, Clone)]
pub struct YamlReportStore {
    dir: PathBuf,
}

impl YamlReportStore {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            dir: project_root.as_ref().join(REPORT_DIR),
        }
    }

    /// File holding the report of `generator`.
    pub fn path_for(&self, generator: &str) -> PathBuf {
        self.dir.join(format!("{generator}_report.yml"))
    }

    fn error(generator: &str, reason: impl ToString) -> ApplicationError {
        ApplicationError::ReportStore {
            generator: generator.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ReportStore for YamlReportStore {
    #[instrument(skip(self))]
    fn load(&self, generator: &str) -> RegenResult<Option<Report>> {
        let path = self.path_for(generator);
        if !path.exists() {
            debug!(path = %path.display(), "no report file");
            return Ok(None);
        }

        let text = std::fs::read_to_string(&path).map_err(|e| Self::error(generator, e))?;
        let report: Report =
            serde_yaml::from_str(&text).map_err(|e| Self::error(generator, e))?;
        Ok(Some(report))
    }

    #[instrument(skip(self, report))]
    fn save(&self, generator: &str, report: &Report) -> RegenResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::error(generator, e))?;
        let text = serde_yaml::to_string(report).map_err(|e| Self::error(generator, e))?;
        let path = self.path_for(generator);
        std::fs::write(&path, text).map_err(|e| Self::error(generator, e))?;
        debug!(path = %path.display(), files = report.files.len(), "report saved");
        Ok(())
    }
}
