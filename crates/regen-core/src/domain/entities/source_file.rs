//! Declared output artifacts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        common::RelativePath,
        drift::{FileStatus, Severity},
    },
    error::DomainError,
};

/// Origins ending with this suffix are rendered as templates.
pub const TEMPLATE_SUFFIX: &str = ".hbs";

/// How a generated file relates to hand-written code.
///
/// The kind never changes how a file is produced; it only decides how
/// alarming drift on that file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// Static asset copied once; edits are expected.
    Copy,
    /// Generated code that other code depends on.
    CorePart,
    /// Entirely generated; never edit by hand.
    FullGen,
    /// Starting point meant to be filled in by hand.
    Skeleton,
}

impl FileKind {
    /// Severity of a drift status for this kind of file.
    pub const fn severity(self, status: FileStatus) -> Severity {
        match (self, status) {
            (Self::Copy, FileStatus::Same | FileStatus::Deleted) => Severity::Info,
            (Self::Copy, FileStatus::Edited) => Severity::Ok,

            (Self::CorePart | Self::FullGen, FileStatus::Same) => Severity::Ok,
            (Self::CorePart, FileStatus::Edited) => Severity::Warning,
            (Self::FullGen, FileStatus::Edited) => Severity::Danger,

            (Self::Skeleton, FileStatus::Same) => Severity::Warning,
            (Self::Skeleton, FileStatus::Edited) => Severity::Ok,

            (Self::CorePart | Self::FullGen | Self::Skeleton, FileStatus::Deleted) => {
                Severity::Danger
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::CorePart => "core-part",
            Self::FullGen => "full-gen",
            Self::Skeleton => "skeleton",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "copy" => Ok(Self::Copy),
            "core-part" | "corepart" => Ok(Self::CorePart),
            "full-gen" | "fullgen" => Ok(Self::FullGen),
            "skeleton" => Ok(Self::Skeleton),
            _ => Err(DomainError::UnknownFileKind {
                value: s.to_string(),
            }),
        }
    }
}

/// How the origin content becomes the destination content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Byte-for-byte copy; directories are copied recursively.
    #[default]
    Verbatim,
    /// Parsed and executed against a render context.
    Template,
}

/// Hex-encoded content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One declared output artifact of a generator.
///
/// Only `path`, `kind` and `hash` are persisted; the origin and strategy
/// come from the live declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(skip)]
    pub origin: RelativePath,

    /// Destination relative to the project root.
    pub path: RelativePath,

    pub kind: FileKind,

    #[serde(rename = "hash", default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,

    #[serde(skip)]
    pub strategy: RenderStrategy,
}

impl SourceFile {
    /// Declare a file whose destination mirrors its origin.
    ///
    /// An origin ending in [`TEMPLATE_SUFFIX`] is templated and lands at the
    /// same path without the suffix.
    pub fn new(origin: impl Into<String>, kind: FileKind) -> Result<Self, DomainError> {
        let origin = origin.into();
        let (path, strategy) = match origin.strip_suffix(TEMPLATE_SUFFIX) {
            Some(stripped) => (stripped.to_string(), RenderStrategy::Template),
            None => (origin.clone(), RenderStrategy::Verbatim),
        };
        Ok(Self {
            origin: RelativePath::try_new(origin)?,
            path: RelativePath::try_new(path)?,
            kind,
            digest: None,
            strategy,
        })
    }

    /// Declare a file with an explicit destination.
    pub fn with_destination(
        origin: impl Into<String>,
        path: impl Into<String>,
        kind: FileKind,
    ) -> Result<Self, DomainError> {
        let origin = origin.into();
        let strategy = if origin.ends_with(TEMPLATE_SUFFIX) {
            RenderStrategy::Template
        } else {
            RenderStrategy::Verbatim
        };
        Ok(Self {
            origin: RelativePath::try_new(origin)?,
            path: RelativePath::try_new(path.into())?,
            kind,
            digest: None,
            strategy,
        })
    }

    /// Override the strategy inferred from the origin name.
    pub fn templated(mut self, templated: bool) -> Self {
        self.strategy = if templated {
            RenderStrategy::Template
        } else {
            RenderStrategy::Verbatim
        };
        self
    }

    pub fn is_templated(&self) -> bool {
        self.strategy == RenderStrategy::Template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_suffix_is_stripped_from_destination() {
        let f = SourceFile::new("src/app.rs.hbs", FileKind::CorePart).unwrap();
        assert_eq!(f.path.to_slash_string(), "src/app.rs");
        assert_eq!(f.origin.to_slash_string(), "src/app.rs.hbs");
        assert!(f.is_templated());
    }

    #[test]
    fn plain_origin_is_copied_verbatim() {
        let f = SourceFile::new("static/logo.png", FileKind::Copy).unwrap();
        assert_eq!(f.path, f.origin);
        assert_eq!(f.strategy, RenderStrategy::Verbatim);
    }

    #[test]
    fn explicit_destination_keeps_strategy_from_origin() {
        let f = SourceFile::with_destination("gitignore.hbs", ".gitignore", FileKind::Skeleton)
            .unwrap();
        assert_eq!(f.path.to_slash_string(), ".gitignore");
        assert!(f.is_templated());
        assert!(!f.clone().templated(false).is_templated());
    }

    #[test]
    fn absolute_destination_is_rejected() {
        let err = SourceFile::with_destination("a.txt", "/etc/a.txt", FileKind::Copy).unwrap_err();
        assert!(matches!(err, DomainError::AbsolutePathNotAllowed { .. }));
    }

    #[test]
    fn escaping_destination_is_rejected() {
        let err = SourceFile::with_destination("a.txt", "../../outside.txt", FileKind::Copy)
            .unwrap_err();
        assert!(matches!(err, DomainError::ParentDirNotAllowed { .. }));
    }

    #[test]
    fn escaping_origin_is_rejected() {
        let err = SourceFile::new("../secrets.txt", FileKind::Copy).unwrap_err();
        assert!(matches!(err, DomainError::ParentDirNotAllowed { .. }));
    }

    #[test]
    fn kind_parses_loose_spellings() {
        assert_eq!("core_part".parse::<FileKind>().unwrap(), FileKind::CorePart);
        assert_eq!("FullGen".parse::<FileKind>().unwrap(), FileKind::FullGen);
        assert!("partial".parse::<FileKind>().is_err());
    }

    #[test]
    fn severity_table_matches_kind_semantics() {
        assert_eq!(FileKind::Copy.severity(FileStatus::Deleted), Severity::Info);
        assert_eq!(FileKind::Copy.severity(FileStatus::Edited), Severity::Ok);
        assert_eq!(FileKind::CorePart.severity(FileStatus::Edited), Severity::Warning);
        assert_eq!(FileKind::FullGen.severity(FileStatus::Edited), Severity::Danger);
        assert_eq!(FileKind::Skeleton.severity(FileStatus::Same), Severity::Warning);
        assert_eq!(FileKind::Skeleton.severity(FileStatus::Deleted), Severity::Danger);
    }

    #[test]
    fn only_persisted_fields_are_serialized() {
        let mut f = SourceFile::new("a.txt.hbs", FileKind::FullGen).unwrap();
        f.digest = Some(Digest::from_hex("abc"));
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "path": "a.txt", "kind": "full-gen", "hash": "abc" })
        );
    }
}
