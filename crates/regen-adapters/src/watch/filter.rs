//! Include/exclude filtering of changed paths.

use std::path::{Path, PathBuf};

use regex::RegexSet;
use regen_core::{application::ApplicationError, error::RegenResult};

/// Decides whether a changed path qualifies for dispatch.
///
/// Patterns are unanchored regular expressions matched against the path
/// relative to the watch root, with `/` separators. A path qualifies when it
/// matches at least one include pattern and no exclude pattern.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    include: RegexSet,
    exclude: RegexSet,
}

impl PathFilter {
    pub fn new(
        root: impl Into<PathBuf>,
        include: &[String],
        exclude: &[String],
    ) -> RegenResult<Self> {
        let root = root.into();
        let compile = |patterns: &[String]| {
            RegexSet::new(patterns).map_err(|e| ApplicationError::WatchFailed {
                root: root.clone(),
                reason: format!("invalid pattern: {e}"),
            })
        };

        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matches(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let candidate = relative.to_string_lossy().replace('\\', "/");
        self.include.is_match(&candidate) && !self.exclude.is_match(&candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str]) -> PathFilter {
        let owned = |p: &[&str]| p.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        PathFilter::new("/site/static", &owned(include), &owned(exclude)).unwrap()
    }

    #[test]
    fn include_is_required() {
        let f = filter(&[r".*\.scss$"], &[]);
        assert!(f.matches(Path::new("/site/static/css/main.scss")));
        assert!(!f.matches(Path::new("/site/static/css/main.css")));
    }

    #[test]
    fn empty_include_matches_nothing() {
        let f = filter(&[], &[]);
        assert!(!f.matches(Path::new("/site/static/a.txt")));
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = filter(&[r".*\.scss$"], &[r"^vendor/"]);
        assert!(f.matches(Path::new("/site/static/css/main.scss")));
        assert!(!f.matches(Path::new("/site/static/vendor/lib.scss")));
    }

    #[test]
    fn patterns_see_root_relative_paths() {
        let f = filter(&["^css/"], &[]);
        assert!(f.matches(Path::new("/site/static/css/a.scss")));
        assert!(!f.matches(Path::new("/site/static/js/css/a.scss")));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = PathFilter::new("/r", &["(".to_string()], &[]).unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }
}
