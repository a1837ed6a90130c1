//! In-memory template source.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use regen_core::{
    application::{ApplicationError, OriginKind, ports::TemplateSource},
    domain::RelativePath,
    error::RegenResult,
};

/// Thread-safe in-memory template source keyed by slash-separated origin.
#[derive(Clone, Default)]
pub struct InMemoryTemplateSource {
    inner: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryTemplateSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from `(origin, body)` pairs.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let source = Self::new();
        for (origin, body) in entries {
            source.insert(origin, body.as_bytes());
        }
        source
    }

    pub fn insert(&self, origin: impl Into<String>, body: impl Into<Vec<u8>>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(origin.into(), body.into());
        }
    }

    /// Get the number of stored files.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn not_found(origin: &RelativePath) -> ApplicationError {
        ApplicationError::OriginNotFound {
            origin: origin.to_slash_string(),
        }
    }
}

impl TemplateSource for InMemoryTemplateSource {
    fn kind(&self, origin: &RelativePath) -> RegenResult<OriginKind> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let key = origin.to_slash_string();
        let prefix = format!("{key}/");

        if inner.contains_key(&key) {
            Ok(OriginKind::File)
        } else if inner.keys().any(|k| k.starts_with(&prefix)) {
            Ok(OriginKind::Directory)
        } else {
            Err(Self::not_found(origin).into())
        }
    }

    fn read(&self, origin: &RelativePath) -> RegenResult<Vec<u8>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner
            .get(&origin.to_slash_string())
            .cloned()
            .ok_or_else(|| Self::not_found(origin).into())
    }

    fn list_files(&self, origin: &RelativePath) -> RegenResult<Vec<RelativePath>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let prefix = format!("{}/", origin.to_slash_string());

        inner
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(|rest| -> RegenResult<RelativePath> { Ok(RelativePath::try_new(rest)?) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_origin_is_a_key_prefix() {
        let source = InMemoryTemplateSource::from_entries([
            ("static/a.css", "a"),
            ("static/img/b.svg", "b"),
            ("staticky.txt", "c"),
        ]);

        let origin = RelativePath::new("static");
        assert_eq!(source.kind(&origin).unwrap(), OriginKind::Directory);
        let listed: Vec<_> = source
            .list_files(&origin)
            .unwrap()
            .iter()
            .map(RelativePath::to_slash_string)
            .collect();
        assert_eq!(listed, vec!["a.css", "img/b.svg"]);
    }

    #[test]
    fn missing_origin_is_not_found() {
        let source = InMemoryTemplateSource::new();
        assert!(source.is_empty());
        assert!(source.read(&RelativePath::new("x")).is_err());
    }
}
