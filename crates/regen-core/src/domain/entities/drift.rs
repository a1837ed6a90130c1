//! Drift classification produced by comparing a persisted report with the
//! live project.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::{common::RelativePath, source_file::FileKind};

/// State of one previously generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Same,
    Edited,
    Deleted,
}

impl FileStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Same => "SAME",
            Self::Edited => "EDITED",
            Self::Deleted => "DELETED",
        }
    }
}

/// How much attention a drift line deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Ok,
    Warning,
    Danger,
}

impl Severity {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Info => "💡",
            Self::Ok => "✅",
            Self::Warning => "⚠️",
            Self::Danger => "❌",
        }
    }
}

/// A reason to regenerate that is not tied to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    ConfigChanged,
    VersionChanged { from: u32, to: u32 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigChanged => f.write_str(
                "The generator could be run to update files following the new configuration.",
            ),
            Self::VersionChanged { from, to } => write!(
                f,
                "The generator could be run to update files following the new version (v{from} → v{to})."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftEntry {
    pub path: RelativePath,
    pub kind: FileKind,
    pub status: FileStatus,
}

impl DriftEntry {
    pub fn severity(&self) -> Severity {
        self.kind.severity(self.status)
    }
}

/// Everything `regen report` knows about one generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub generator: String,
    pub version: u32,
    pub never_generated: bool,
    pub notices: Vec<Notice>,
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    pub fn new(generator: impl Into<String>, version: u32) -> Self {
        Self {
            generator: generator.into(),
            version,
            never_generated: false,
            notices: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// No notices and every file unchanged.
    pub fn is_clean(&self) -> bool {
        !self.never_generated
            && self.notices.is_empty()
            && self.entries.iter().all(|e| e.status == FileStatus::Same)
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "======= {} generator report (v{}) =======",
            self.generator, self.version
        )?;

        if self.never_generated {
            return writeln!(f, "No report for this generator found.");
        }

        for notice in &self.notices {
            writeln!(f, "{} [INFO] {}", Severity::Info.icon(), notice)?;
        }

        for entry in &self.entries {
            writeln!(
                f,
                "{} [{}] {}",
                entry.severity().icon(),
                entry.status.label(),
                entry.path
            )?;
        }

        Ok(())
    }
}
