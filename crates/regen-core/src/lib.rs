//! regen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for regen, an
//! incremental project generator that records what it produced and reports
//! drift on later runs.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            regen-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (GenerationService, Generator)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateSource, Reports,   │
//! │  Renderer, Formatter, CommandRunner)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     regen-adapters (Infrastructure)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (SourceFile, Report, ConfigSnapshot,   │
//! │   DriftReport, naming helpers)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use regen_core::prelude::*;
//!
//! # fn run(ports: GeneratorPorts) -> RegenResult<()> {
//! let spec = GeneratorSpec::new("base", 1)
//!     .selector("dev.port")
//!     .file(SourceFile::new("src/main.rs.hbs", FileKind::CorePart)?);
//!
//! let settings = ProjectSettings::default();
//! let mut generator = Generator::new(spec, &settings, "./my-project", ports);
//! generator.generate(&RenderContext::Shared(settings.to_value()));
//! println!("{}", generator.report());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateOutcome, GenerationService, Generator, GeneratorPorts,
        ports::{
            CommandRunner, Filesystem, ReportStore, SourceFormatter, TemplateRenderer,
            TemplateSource,
        },
    };
    pub use crate::domain::{
        DriftReport, FileKind, GeneratorSpec, Project, ProjectSettings, RenderContext, Report,
        SelectorSource, SourceFile,
    };
    pub use crate::error::{RegenError, RegenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
