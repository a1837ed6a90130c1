use crate::domain::{entities::source_file::SourceFile, error::DomainError};

/// Declaration of one named generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    pub name: String,
    /// Schema version; bumping it flags every project for regeneration.
    pub version: u32,
    /// Dotted configuration paths captured into the report snapshot.
    pub selectors: Vec<String>,
    pub files: Vec<SourceFile>,
}

impl GeneratorSpec {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            selectors: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn selector(mut self, path: impl Into<String>) -> Self {
        self.selectors.push(path.into());
        self
    }

    pub fn file(mut self, file: SourceFile) -> Self {
        self.files.push(file);
        self
    }

    /// Destination paths are not checked for uniqueness; a later file with
    /// the same path overwrites an earlier one.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyGeneratorName);
        }
        if self.name.contains(['/', '\\']) {
            return Err(DomainError::InvalidGenerator(format!(
                "name '{}' must not contain path separators",
                self.name
            )));
        }
        if self.files.is_empty() {
            return Err(DomainError::InvalidGenerator(format!(
                "generator '{}' declares no files",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::source_file::FileKind;

    fn file() -> SourceFile {
        SourceFile::new("a.txt", FileKind::Copy).unwrap()
    }

    #[test]
    fn builder_collects_parts() {
        let spec = GeneratorSpec::new("base", 2)
            .selector("dev.port")
            .file(file());
        assert_eq!(spec.selectors, vec!["dev.port"]);
        assert_eq!(spec.files.len(), 1);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let spec = GeneratorSpec::new("  ", 1).file(file());
        assert_eq!(spec.validate(), Err(DomainError::EmptyGeneratorName));
    }

    #[test]
    fn name_with_separator_is_rejected() {
        let spec = GeneratorSpec::new("a/b", 1).file(file());
        assert!(matches!(
            spec.validate(),
            Err(DomainError::InvalidGenerator(_))
        ));
    }

    #[test]
    fn generator_without_files_is_rejected() {
        assert!(GeneratorSpec::new("base", 1).validate().is_err());
    }
}
