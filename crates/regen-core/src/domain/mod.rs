//! Core domain layer for regen.
//!
//! Pure data and rules: declared files, persisted reports, configuration
//! snapshots, drift classification and the naming helpers offered to
//! templates. All I/O happens behind the ports in `crate::application`.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Value types**: Entities are Clone + PartialEq
pub mod entities;
pub mod error;
pub mod naming;
pub mod selector;
pub mod settings;

mod validation;

pub use entities::{
    common::RelativePath,
    drift::{DriftEntry, DriftReport, FileStatus, Notice, Severity},
    generator_spec::GeneratorSpec,
    project::{
        ContextSource, DEFAULT_TEMPLATES_DIR, DEFAULT_WATCH_DELAY, GeneratorDecl, Project,
        WatchAction, WatchSpec,
    },
    render_context::RenderContext,
    report::Report,
    source_file::{Digest, FileKind, RenderStrategy, SourceFile, TEMPLATE_SUFFIX},
};

pub use error::{DomainError, ErrorCategory};
pub use selector::{ConfigSnapshot, Selector, SelectorSource};
pub use settings::{Features, NetworkConfig, ProjectSettings};
pub use validation::DomainValidator;
