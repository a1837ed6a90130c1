use serde::{Deserialize, Serialize};

use crate::domain::{entities::source_file::SourceFile, selector::ConfigSnapshot};

/// Persisted description of what a generator produced.
///
/// An empty report (no files) stands for "never generated".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub config: ConfigSnapshot,
    #[serde(default)]
    pub version: u32,
}

impl Report {
    pub fn new(files: Vec<SourceFile>, config: ConfigSnapshot, version: u32) -> Self {
        Self {
            files,
            config,
            version,
        }
    }

    pub fn is_cold(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::source_file::{Digest, FileKind};
    use serde_json::json;

    #[test]
    fn default_report_is_cold() {
        assert!(Report::default().is_cold());
    }

    #[test]
    fn persisted_shape_has_files_config_version() {
        let mut file = SourceFile::new("a.txt", FileKind::Copy).unwrap();
        file.digest = Some(Digest::from_hex("00ff"));
        let config = [("dev.port".to_string(), json!(8100))]
            .into_iter()
            .collect();
        let report = Report::new(vec![file], config, 3);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "files": [{ "path": "a.txt", "kind": "copy", "hash": "00ff" }],
                "config": { "dev.port": 8100 },
                "version": 3
            })
        );
    }

    #[test]
    fn missing_sections_deserialize_as_cold() {
        let report: Report = serde_json::from_str("{}").unwrap();
        assert!(report.is_cold());
        assert_eq!(report.version, 0);
    }
}
