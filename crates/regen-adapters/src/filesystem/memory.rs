//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use regen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::RegenResult,
};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content as text (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// Remove a file, simulating a user deletion.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        match self.inner.write() {
            Ok(mut inner) => inner.files.remove(path.as_ref()).is_some(),
            Err(_) => false,
        }
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> RegenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> RegenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(parent) = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !inner.directories.contains(*p))
        {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Parent directory {} does not exist", parent.display()),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> RegenResult<Vec<u8>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "File does not exist".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn walk_files(&self, path: &Path) -> RegenResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/p/a/b.txt"), b"x").is_err());

        fs.create_dir_all(Path::new("/p/a")).unwrap();
        fs.write_file(Path::new("/p/a/b.txt"), b"x").unwrap();
        assert_eq!(fs.contents("/p/a/b.txt").as_deref(), Some("x"));
        assert!(fs.is_dir(Path::new("/p")));
    }

    #[test]
    fn walk_lists_files_below_path_in_order() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/d")).unwrap();
        fs.write_file(Path::new("/p/d/b"), b"").unwrap();
        fs.write_file(Path::new("/p/d/a"), b"").unwrap();
        fs.write_file(Path::new("/p/x"), b"").unwrap();

        assert_eq!(
            fs.walk_files(Path::new("/p/d")).unwrap(),
            vec![PathBuf::from("/p/d/a"), PathBuf::from("/p/d/b")]
        );
    }
}
