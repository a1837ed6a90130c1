//! Canonical formatting of generated Rust sources via `rustfmt`.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use regen_core::{
    application::{ApplicationError, ports::SourceFormatter},
    error::RegenResult,
};

/// Pipes `.rs` output through `rustfmt`.
#[derive(Debug, Clone)]
pub struct RustfmtFormatter {
    binary: String,
    edition: String,
}

impl RustfmtFormatter {
    pub fn new() -> Self {
        Self {
            binary: "rustfmt".into(),
            edition: "2024".into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn failed(reason: impl ToString) -> ApplicationError {
        ApplicationError::FormattingFailed {
            reason: reason.to_string(),
        }
    }
}

impl Default for RustfmtFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFormatter for RustfmtFormatter {
    fn handles(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "rs")
    }

    fn format(&self, source: &str) -> RegenResult<String> {
        let mut child = Command::new(&self.binary)
            .args(["--edition", &self.edition, "--emit", "stdout", "--quiet"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(Self::failed)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(Self::failed)?;
        }

        let output = child.wait_with_output().map_err(Self::failed)?;
        if !output.status.success() {
            return Err(Self::failed(String::from_utf8_lossy(&output.stderr).trim()).into());
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Self::failed(e).into())
    }
}
