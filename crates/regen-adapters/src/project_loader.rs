//! Project file loader.
//!
//! Reads `.regen/project.yml` and converts it into a domain [`Project`].
//!
//! # `project.yml` format
//!
//! ```yaml
//! settings:
//!   project_name: demo
//!   dev: { domain: localhost, port: 8100, ipv6: false }
//!   vars: { pages: [{ title: Home }, { title: About }] }
//! templates: .regen/templates
//! generators:
//!   - name: base
//!     version: 1
//!     selectors: [dev.port]
//!     files:
//!       - { origin: main.rs.hbs, kind: core-part }
//!       - { origin: static, path: public, kind: copy }
//!   - name: pages
//!     context: vars.pages
//!     per_file: true
//!     files:
//!       - { origin: page.html.hbs, path: home.html, kind: full-gen }
//!       - { origin: page.html.hbs, path: about.html, kind: full-gen }
//! watch:
//!   - root: static/css
//!     include: ['.*\.scss$']
//!     command: "sass {path}"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as Yaml};
use tracing::{debug, info, instrument};

use regen_core::{
    application::ApplicationError,
    domain::{
        ContextSource, DEFAULT_TEMPLATES_DIR, DEFAULT_WATCH_DELAY, DomainError, FileKind,
        GeneratorDecl, GeneratorSpec, Project, ProjectSettings, RelativePath, SourceFile,
        WatchAction, WatchSpec,
    },
    error::{RegenError, RegenResult},
};

/// Project directory, relative to the project root.
pub const PROJECT_DIR: &str = ".regen";

/// Project file, relative to the project root.
pub const PROJECT_FILE: &str = ".regen/project.yml";

const SETTINGS_KEY: &str = "settings";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of `project.yml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectManifest {
    pub settings: ProjectSettings,
    pub templates: Option<String>,
    pub generators: Vec<GeneratorEntry>,
    pub watch: Vec<WatchEntry>,
}

/// One entry under `generators`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorEntry {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Settings path used as the render context instead of the whole settings.
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub per_file: bool,
    pub files: Vec<FileEntry>,
}

/// One declared file of a generator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileEntry {
    /// Path under the templates directory.
    pub origin: String,
    /// Destination under the project; defaults to the origin without `.hbs`.
    #[serde(default)]
    pub path: Option<String>,
    pub kind: String,
    /// Forces templating on or off regardless of the origin suffix.
    #[serde(default)]
    pub templated: Option<bool>,
}

/// One entry under `watch`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchEntry {
    pub root: String,
    /// Regexes a changed path must match at least one of.
    #[serde(default = "include_everything")]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub generate: Vec<String>,
}

fn default_version() -> u32 {
    1
}

fn include_everything() -> Vec<String> {
    vec![".*".to_string()]
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads and updates the project file of one project root.
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    root: PathBuf,
    default_delay: Duration,
}

impl ProjectLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_delay: DEFAULT_WATCH_DELAY,
        }
    }

    /// Debounce delay for watch entries without `delay_ms`.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_file(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    pub fn exists(&self) -> bool {
        self.project_file().is_file()
    }

    /// Load the project. A missing project file yields the built-in defaults.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> RegenResult<Project> {
        let path = self.project_file();
        if !path.exists() {
            info!(path = %path.display(), "no project file, using defaults");
            return Ok(Project::default());
        }

        let raw = fs::read_to_string(&path).map_err(|e| self.invalid(e))?;
        let manifest: ProjectManifest =
            serde_yaml::from_str(&raw).map_err(|e| self.invalid(e))?;
        let project = self.build(manifest)?;

        debug!(
            generators = project.generators.len(),
            watches = project.watches.len(),
            "project loaded"
        );
        Ok(project)
    }

    /// Convert a parsed manifest into a validated [`Project`].
    pub fn build(&self, manifest: ProjectManifest) -> RegenResult<Project> {
        let templates = manifest
            .templates
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATES_DIR);

        let generators = manifest
            .generators
            .into_iter()
            .map(|entry| {
                let name = entry.name.clone();
                generator_decl(entry).map_err(|e| {
                    RegenError::from(self.invalid(format!("generator '{name}': {e}")))
                })
            })
            .collect::<RegenResult<Vec<_>>>()?;

        let watches = manifest
            .watch
            .into_iter()
            .map(|entry| {
                let root = entry.root.clone();
                watch_spec(entry, self.default_delay)
                    .map_err(|e| RegenError::from(self.invalid(format!("watch '{root}': {e}"))))
            })
            .collect::<RegenResult<Vec<_>>>()?;

        let project = Project {
            settings: manifest.settings,
            templates: RelativePath::try_new(templates).map_err(|e| self.invalid(e))?,
            generators,
            watches,
        };
        project.validate().map_err(|e| self.invalid(e))?;
        Ok(project)
    }

    /// Rewrite the `settings` section of the project file, leaving every other
    /// key as written.
    #[instrument(skip(self, settings), fields(root = %self.root.display()))]
    pub fn save_settings(&self, settings: &ProjectSettings) -> RegenResult<()> {
        let path = self.project_file();

        let mut document = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| self.invalid(e))?;
            match serde_yaml::from_str::<Yaml>(&raw).map_err(|e| self.invalid(e))? {
                Yaml::Mapping(mapping) => mapping,
                Yaml::Null => Mapping::new(),
                _ => return Err(self.invalid("top level must be a mapping").into()),
            }
        } else {
            Mapping::new()
        };

        let value = serde_yaml::to_value(settings).map_err(|e| self.invalid(e))?;
        document.insert(Yaml::from(SETTINGS_KEY), value);

        let text = serde_yaml::to_string(&document).map_err(|e| self.invalid(e))?;
        self.write_project_file(&text)?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Write raw project file contents, creating `.regen/` when needed.
    pub fn write_project_file(&self, text: &str) -> RegenResult<()> {
        let path = self.project_file();
        fs::create_dir_all(self.root.join(PROJECT_DIR)).map_err(|e| self.io(&path, e))?;
        fs::write(&path, text).map_err(|e| self.io(&path, e))?;
        Ok(())
    }

    fn invalid(&self, reason: impl ToString) -> ApplicationError {
        ApplicationError::InvalidProjectFile {
            path: self.project_file(),
            reason: reason.to_string(),
        }
    }

    fn io(&self, path: &Path, e: std::io::Error) -> ApplicationError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

fn generator_decl(entry: GeneratorEntry) -> Result<GeneratorDecl, DomainError> {
    let mut spec = GeneratorSpec::new(entry.name, entry.version);
    spec.selectors = entry.selectors;

    for file in entry.files {
        let kind: FileKind = file.kind.parse()?;
        let origin = file.origin.trim_end_matches('/');
        let mut source = match file.path.as_deref() {
            Some(path) => SourceFile::with_destination(origin, path.trim_end_matches('/'), kind)?,
            None => SourceFile::new(origin, kind)?,
        };
        if let Some(templated) = file.templated {
            source = source.templated(templated);
        }
        spec = spec.file(source);
    }

    let context = match entry.context {
        Some(path) => ContextSource::Selector {
            path,
            per_file: entry.per_file,
        },
        None => ContextSource::Settings,
    };

    Ok(GeneratorDecl::new(spec).with_context(context))
}

fn watch_spec(entry: WatchEntry, default_delay: Duration) -> Result<WatchSpec, DomainError> {
    Ok(WatchSpec {
        root: RelativePath::try_new(entry.root.trim_end_matches('/'))?,
        include: entry.include,
        exclude: entry.exclude,
        delay: entry
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(default_delay),
        action: WatchAction {
            command: entry.command,
            generate: entry.generate,
        },
    })
}
