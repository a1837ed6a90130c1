//! A loaded project: settings, generator catalog and watch roots.

use std::collections::HashSet;
use std::time::Duration;

use crate::domain::{
    entities::{common::RelativePath, generator_spec::GeneratorSpec, render_context::RenderContext},
    error::DomainError,
    selector::SelectorSource,
    settings::ProjectSettings,
};

pub const DEFAULT_TEMPLATES_DIR: &str = ".regen/templates";
pub const DEFAULT_WATCH_DELAY: Duration = Duration::from_millis(200);

/// Where a generator's render context comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextSource {
    /// The whole settings object.
    #[default]
    Settings,
    /// A single settings path. With `per_file`, an array value supplies one
    /// context per declared file.
    Selector { path: String, per_file: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDecl {
    pub spec: GeneratorSpec,
    pub context: ContextSource,
}

impl GeneratorDecl {
    pub fn new(spec: GeneratorSpec) -> Self {
        Self {
            spec,
            context: ContextSource::Settings,
        }
    }

    pub fn with_context(mut self, context: ContextSource) -> Self {
        self.context = context;
        self
    }

    /// Resolve the render context against the live settings. A selector that
    /// does not resolve yields a shared null context.
    pub fn render_context(&self, settings: &ProjectSettings) -> RenderContext {
        match &self.context {
            ContextSource::Settings => RenderContext::Shared(settings.to_value()),
            ContextSource::Selector { path, per_file } => settings
                .resolve(path)
                .map(|value| RenderContext::from_value(value, *per_file))
                .unwrap_or_default(),
        }
    }
}

/// What happens when a watch root settles after a burst of writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchAction {
    /// Shell command; `{path}` and `{project}` are substituted.
    pub command: Option<String>,
    /// Generators to re-run, in order.
    pub generate: Vec<String>,
}

impl WatchAction {
    pub fn is_empty(&self) -> bool {
        self.command.is_none() && self.generate.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    pub root: RelativePath,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub delay: Duration,
    pub action: WatchAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub settings: ProjectSettings,
    pub templates: RelativePath,
    pub generators: Vec<GeneratorDecl>,
    pub watches: Vec<WatchSpec>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            settings: ProjectSettings::default(),
            templates: RelativePath::new(DEFAULT_TEMPLATES_DIR),
            generators: Vec::new(),
            watches: Vec::new(),
        }
    }
}

impl Project {
    pub fn generator(&self, name: &str) -> Option<&GeneratorDecl> {
        self.generators.iter().find(|g| g.spec.name == name)
    }

    pub fn generator_names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.spec.name.as_str()).collect()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for decl in &self.generators {
            decl.spec.validate()?;
            if !seen.insert(decl.spec.name.as_str()) {
                return Err(DomainError::DuplicateGenerator {
                    name: decl.spec.name.clone(),
                });
            }
        }

        for watch in &self.watches {
            if watch.action.is_empty() {
                return Err(DomainError::InvalidGenerator(format!(
                    "watch on '{}' has neither a command nor generators to run",
                    watch.root
                )));
            }
            if let Some(unknown) = watch
                .action
                .generate
                .iter()
                .find(|name| !seen.contains(name.as_str()))
            {
                return Err(DomainError::InvalidGenerator(format!(
                    "watch on '{}' refers to unknown generator '{}'",
                    watch.root, unknown
                )));
            }
        }

        Ok(())
    }
}
