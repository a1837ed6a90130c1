use crate::domain::{
    entities::{generator_spec::GeneratorSpec, project::Project},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_generator(spec: &GeneratorSpec) -> Result<(), DomainError> {
        spec.validate()
    }

    pub fn validate_project(project: &Project) -> Result<(), DomainError> {
        project.validate()
    }
}
