//! Application layer for regen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, Generator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain layer through ports; file
//! classification and snapshot rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    FileFailure, GenerateOutcome, GenerationService, Generator, GeneratorPorts, digest,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandOutput, CommandRunner, Filesystem, OriginKind, ReportStore, SourceFormatter,
    TemplateRenderer, TemplateSource,
};

pub use error::ApplicationError;
