//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate these files" or "report drift".

pub mod digest;
pub mod generation_service;
pub mod generator;

pub use generation_service::GenerationService;
pub use generator::{FileFailure, GenerateOutcome, Generator, GeneratorPorts};
