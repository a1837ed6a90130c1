//! Generation Service - main application orchestrator.
//!
//! This service owns a loaded [`Project`] and the shared adapters, and
//! builds one [`Generator`] per requested name:
//! 1. Resolve requested names against the generator catalog
//! 2. Construct the generator against the live settings
//! 3. Generate or report
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        services::generator::{GenerateOutcome, Generator, GeneratorPorts},
    },
    domain::{DomainValidator as validator, DriftReport, GeneratorDecl, Project},
    error::{RegenError, RegenResult},
};

/// Main generation service.
pub struct GenerationService {
    project: Project,
    project_root: PathBuf,
    ports: GeneratorPorts,
}

impl GenerationService {
    /// Create a service for a validated project.
    pub fn new(
        project: Project,
        project_root: impl Into<PathBuf>,
        ports: GeneratorPorts,
    ) -> RegenResult<Self> {
        validator::validate_project(&project).map_err(RegenError::Domain)?;
        Ok(Self {
            project,
            project_root: project_root.into(),
            ports,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Turn user-supplied names into catalog order. No names means every
    /// generator.
    pub fn resolve_names(&self, requested: &[String]) -> RegenResult<Vec<String>> {
        if requested.is_empty() {
            return Ok(self
                .project
                .generator_names()
                .into_iter()
                .map(String::from)
                .collect());
        }

        requested
            .iter()
            .map(|name| self.decl(name).map(|d| d.spec.name.clone()))
            .collect()
    }

    /// Construct a generator for `name`.
    pub fn generator(&self, name: &str) -> RegenResult<Generator> {
        let decl = self.decl(name)?;
        Ok(Generator::new(
            decl.spec.clone(),
            &self.project.settings,
            &self.project_root,
            self.ports.clone(),
        ))
    }

    /// Run one generator with its declared render context.
    #[instrument(skip(self))]
    pub fn generate(&self, name: &str) -> RegenResult<GenerateOutcome> {
        let decl = self.decl(name)?;
        let context = decl.render_context(&self.project.settings);
        let mut generator = self.generator(name)?;
        let outcome = generator.generate(&context);
        info!(generator = name, ?outcome, "generator run complete");
        Ok(outcome)
    }

    pub fn report(&self, name: &str) -> RegenResult<DriftReport> {
        Ok(self.generator(name)?.report())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn decl(&self, name: &str) -> RegenResult<&GeneratorDecl> {
        self.project.generator(name).ok_or_else(|| {
            ApplicationError::UnknownGenerator {
                name: name.to_string(),
                available: self
                    .project
                    .generator_names()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }
            .into()
        })
    }
}
