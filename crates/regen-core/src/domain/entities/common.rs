use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to be **relative** and to stay below the
/// directory it is resolved against.
///
/// Generated destinations are always resolved against a project root, so an
/// absolute path or a `..` component here would escape it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the provided path is absolute or contains `..`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Err(e) = Self::check(&path) {
            panic!("invalid RelativePath: {e}");
        }
        Self(path)
    }

    /// Try to create a relative path.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        Self::check(&path)?;
        Ok(Self(path))
    }

    fn check(path: &Path) -> Result<(), DomainError> {
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(DomainError::ParentDirNotAllowed {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    /// Join a relative segment onto this path.
    ///
    /// # Panics
    /// Panics if the segment is absolute or contains `..`.
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        let segment = segment.as_ref();
        if let Err(e) = Self::check(segment) {
            panic!("cannot join onto RelativePath: {e}");
        }
        Self(self.0.join(segment))
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve against a root directory.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// The path as forward-slash text, stable across platforms.
    pub fn to_slash_string(&self) -> String {
        self.0.to_string_lossy().replace('\\', "/")
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_slash_string())
    }
}

impl<'de> Deserialize<'de> for RelativePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RelativePath::try_new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_accepts_relative() {
        let p = RelativePath::new("src/main.rs");
        assert_eq!(p.as_path(), Path::new("src/main.rs"));
    }

    #[test]
    #[should_panic]
    fn relative_path_rejects_absolute() {
        RelativePath::new("/etc/passwd");
    }

    #[test]
    fn try_new_rejects_absolute() {
        let result = RelativePath::try_new("/etc/passwd");
        assert!(matches!(
            result,
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn try_new_rejects_parent_components() {
        for raw in ["../outside.txt", "a/../../b", "src/.."] {
            assert!(
                matches!(
                    RelativePath::try_new(raw),
                    Err(DomainError::ParentDirNotAllowed { .. })
                ),
                "{raw} was accepted"
            );
        }
        assert!(RelativePath::try_new("./src/main.rs").is_ok());
    }

    #[test]
    #[should_panic]
    fn join_rejects_parent_components() {
        RelativePath::new("static").join("../../etc");
    }

    #[test]
    fn join_relative_path() {
        let base = RelativePath::new("static");
        assert_eq!(base.join("css").as_path(), Path::new("static/css"));
    }

    #[test]
    fn under_joins_root() {
        let p = RelativePath::new("public/app.css");
        assert_eq!(
            p.under(Path::new("/work/demo")),
            PathBuf::from("/work/demo/public/app.css")
        );
    }

    #[test]
    fn deserialize_rejects_absolute() {
        let parsed: Result<RelativePath, _> = serde_json::from_str("\"/tmp/x\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn deserialize_rejects_parent_components() {
        let parsed: Result<RelativePath, _> = serde_json::from_str("\"../x\"");
        assert!(parsed.unwrap_err().to_string().contains("escape"));
    }
}
