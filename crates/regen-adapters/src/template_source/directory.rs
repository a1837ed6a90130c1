//! Template source backed by a directory on disk.

use std::path::{Path, PathBuf};

use regen_core::{
    application::{ApplicationError, OriginKind, ports::TemplateSource},
    domain::RelativePath,
    error::RegenResult,
};
use tracing::trace;

use crate::filesystem::local::{map_io_error, walk_sorted};

/// Reads origins relative to a templates directory.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateSource {
    root: PathBuf,
}

impl DirectoryTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, origin: &RelativePath) -> PathBuf {
        origin.under(&self.root)
    }
}

impl TemplateSource for DirectoryTemplateSource {
    fn kind(&self, origin: &RelativePath) -> RegenResult<OriginKind> {
        let path = self.locate(origin);
        trace!(origin = %origin, path = %path.display(), "resolving origin");
        if path.is_dir() {
            Ok(OriginKind::Directory)
        } else if path.is_file() {
            Ok(OriginKind::File)
        } else {
            Err(ApplicationError::OriginNotFound {
                origin: origin.to_slash_string(),
            }
            .into())
        }
    }

    fn read(&self, origin: &RelativePath) -> RegenResult<Vec<u8>> {
        let path = self.locate(origin);
        if !path.is_file() {
            return Err(ApplicationError::OriginNotFound {
                origin: origin.to_slash_string(),
            }
            .into());
        }
        std::fs::read(&path).map_err(|e| map_io_error(&path, e, "read template"))
    }

    fn list_files(&self, origin: &RelativePath) -> RegenResult<Vec<RelativePath>> {
        let base = self.locate(origin);
        walk_sorted(&base)?
            .into_iter()
            .map(|file| -> RegenResult<RelativePath> {
                let relative = file.strip_prefix(&base).map_err(|e| {
                    ApplicationError::TemplateSource {
                        origin: origin.to_slash_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(RelativePath::try_new(relative)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source() -> (TempDir, DirectoryTemplateSource) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("static/css")).unwrap();
        std::fs::write(dir.path().join("static/css/site.css"), "body {}").unwrap();
        std::fs::write(dir.path().join("static/robots.txt"), "*").unwrap();
        std::fs::write(dir.path().join("main.rs.hbs"), "fn main() {}").unwrap();
        let source = DirectoryTemplateSource::new(dir.path());
        (dir, source)
    }

    #[test]
    fn kinds_are_detected() {
        let (_dir, source) = source();
        assert_eq!(
            source.kind(&RelativePath::new("static")).unwrap(),
            OriginKind::Directory
        );
        assert_eq!(
            source.kind(&RelativePath::new("main.rs.hbs")).unwrap(),
            OriginKind::File
        );
        assert!(source.kind(&RelativePath::new("nope")).is_err());
    }

    #[test]
    fn directory_listing_is_relative_and_sorted() {
        let (_dir, source) = source();
        let files: Vec<_> = source
            .list_files(&RelativePath::new("static"))
            .unwrap()
            .iter()
            .map(RelativePath::to_slash_string)
            .collect();
        assert_eq!(files, vec!["css/site.css", "robots.txt"]);
    }

    #[test]
    fn reading_a_directory_is_not_found() {
        let (_dir, source) = source();
        let err = source.read(&RelativePath::new("static")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
