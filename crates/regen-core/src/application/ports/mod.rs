//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `regen-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Project tree I/O
//!   - `TemplateSource`: Origins of generated files
//!   - `ReportStore`: Persisted reports
//!   - `TemplateRenderer`: Template execution
//!   - `SourceFormatter`: Canonical formatting of rendered code
//!   - `CommandRunner`: Shell commands for watch tasks

pub mod output;

pub use output::{
    CommandOutput, CommandRunner, Filesystem, OriginKind, ReportStore, SourceFormatter,
    TemplateRenderer, TemplateSource,
};

#[cfg(test)]
pub use output::{
    MockCommandRunner, MockFilesystem, MockReportStore, MockSourceFormatter, MockTemplateRenderer,
    MockTemplateSource,
};
