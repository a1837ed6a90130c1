//! Generator engine - materializes a generator's declared files and tracks
//! what was produced.
//!
//! A [`Generator`] lives for one command invocation:
//! 1. Construction captures the live configuration into the next report and
//!    loads the last persisted report (cold start when there is none).
//! 2. [`Generator::generate`] writes every declared file it can, hashes the
//!    destinations and persists the next report.
//! 3. [`Generator::report`] compares the last report with the project as it
//!    is on disk, without side effects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{
            Filesystem, OriginKind, ReportStore, SourceFormatter, TemplateRenderer, TemplateSource,
        },
        services::digest,
    },
    domain::{
        Digest, DriftEntry, DriftReport, FileStatus, GeneratorSpec, Notice, RelativePath,
        RenderContext, RenderStrategy, Report, SelectorSource, SourceFile,
    },
    error::RegenResult,
};

const NULL_CONTEXT: &Value = &Value::Null;

/// Adapters a generator needs, shared across generators of one project.
#[derive(Clone)]
pub struct GeneratorPorts {
    pub filesystem: Arc<dyn Filesystem>,
    pub templates: Arc<dyn TemplateSource>,
    pub reports: Arc<dyn ReportStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub formatter: Option<Arc<dyn SourceFormatter>>,
}

/// A file that could not be produced during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: RelativePath,
    pub reason: String,
}

/// Result of [`Generator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Every file was attempted and the report was persisted.
    Completed {
        written: usize,
        failures: Vec<FileFailure>,
    },
    /// The per-file context count did not match the declared files. Nothing
    /// was written and no report was persisted.
    Aborted { expected: usize, got: usize },
}

impl GenerateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { failures, .. } if failures.is_empty())
    }
}

pub struct Generator {
    name: String,
    project_root: PathBuf,
    next_report: Report,
    last_report: Report,
    ports: GeneratorPorts,
}

impl Generator {
    /// Build a generator from its declaration and the live configuration.
    ///
    /// Loading the last report never fails the construction: a missing or
    /// unreadable report is treated as "never generated".
    #[instrument(skip_all, fields(generator = %spec.name))]
    pub fn new<C: SelectorSource>(
        spec: GeneratorSpec,
        config: &C,
        project_root: impl Into<PathBuf>,
        ports: GeneratorPorts,
    ) -> Self {
        let next_report = Report::new(spec.files, config.snapshot(&spec.selectors), spec.version);

        let last_report = match ports.reports.load(&spec.name) {
            Ok(Some(report)) => report,
            Ok(None) => {
                debug!("no persisted report, starting cold");
                Report::default()
            }
            Err(e) => {
                warn!(error = %e, "failed to load persisted report, starting cold");
                Report::default()
            }
        };

        Self {
            name: spec.name,
            project_root: project_root.into(),
            next_report,
            last_report,
            ports,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next_report(&self) -> &Report {
        &self.next_report
    }

    pub fn last_report(&self) -> &Report {
        &self.last_report
    }

    /// Produce every declared file, refresh digests and persist the report.
    #[instrument(skip_all, fields(generator = %self.name))]
    pub fn generate(&mut self, context: &RenderContext) -> GenerateOutcome {
        let expected = self.next_report.files.len();
        if let Some(got) = context.arity().filter(|&got| got != expected) {
            error!(
                expected,
                got, "context count does not match declared files, aborting"
            );
            return GenerateOutcome::Aborted { expected, got };
        }

        let mut written = 0;
        let mut failures = Vec::new();

        for (index, file) in self.next_report.files.iter().enumerate() {
            let data = context.for_file(index).unwrap_or(NULL_CONTEXT);
            match self.materialize(file, data) {
                Ok(()) => {
                    debug!(path = %file.path, "file written");
                    written += 1;
                }
                Err(e) => {
                    warn!(path = %file.path, error = %e, "skipping file");
                    failures.push(FileFailure {
                        path: file.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.refresh_digests();

        match self.ports.reports.save(&self.name, &self.next_report) {
            Ok(()) => self.last_report = self.next_report.clone(),
            Err(e) => error!(error = %e, "failed to persist report"),
        }

        info!(written, failed = failures.len(), "generation finished");
        GenerateOutcome::Completed { written, failures }
    }

    /// Compare the last persisted report with the live project.
    pub fn report(&self) -> DriftReport {
        let mut drift = DriftReport::new(&self.name, self.next_report.version);

        if self.last_report.is_cold() {
            drift.never_generated = true;
            return drift;
        }

        if self.next_report.config != self.last_report.config {
            drift.notices.push(Notice::ConfigChanged);
        }
        if self.next_report.version != self.last_report.version {
            drift.notices.push(Notice::VersionChanged {
                from: self.last_report.version,
                to: self.next_report.version,
            });
        }

        for file in &self.last_report.files {
            let status = match self.digest_of(&file.path) {
                Some(current) if Some(&current) == file.digest.as_ref() => FileStatus::Same,
                Some(_) => FileStatus::Edited,
                None => FileStatus::Deleted,
            };
            drift.entries.push(DriftEntry {
                path: file.path.clone(),
                kind: file.kind,
                status,
            });
        }

        drift
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn destination(&self, path: &RelativePath) -> PathBuf {
        path.under(&self.project_root)
    }

    fn digest_of(&self, path: &RelativePath) -> Option<Digest> {
        match digest::compute(self.ports.filesystem.as_ref(), &self.destination(path)) {
            Ok(digest) => digest,
            Err(e) => {
                debug!(path = %path, error = %e, "digest unavailable");
                None
            }
        }
    }

    fn refresh_digests(&mut self) {
        for index in 0..self.next_report.files.len() {
            let path = self.next_report.files[index].path.clone();
            if let Some(digest) = self.digest_of(&path) {
                self.next_report.files[index].digest = Some(digest);
            }
        }
    }

    fn materialize(&self, file: &SourceFile, context: &Value) -> RegenResult<()> {
        let dest = self.destination(&file.path);
        if let Some(parent) = dest.parent() {
            self.ports.filesystem.create_dir_all(parent)?;
        }

        match file.strategy {
            RenderStrategy::Verbatim => self.copy_origin(&file.origin, &dest),
            RenderStrategy::Template => self.render_origin(&file.origin, &dest, context),
        }
    }

    fn copy_origin(&self, origin: &RelativePath, dest: &Path) -> RegenResult<()> {
        let fs = &self.ports.filesystem;
        match self.ports.templates.kind(origin)? {
            OriginKind::File => fs.write_file(dest, &self.ports.templates.read(origin)?),
            OriginKind::Directory => {
                fs.create_dir_all(dest)?;
                for relative in self.ports.templates.list_files(origin)? {
                    let target = dest.join(relative.as_path());
                    if let Some(parent) = target.parent() {
                        fs.create_dir_all(parent)?;
                    }
                    let bytes = self.ports.templates.read(&origin.join(relative.as_path()))?;
                    fs.write_file(&target, &bytes)?;
                }
                Ok(())
            }
        }
    }

    fn render_origin(
        &self,
        origin: &RelativePath,
        dest: &Path,
        context: &Value,
    ) -> RegenResult<()> {
        let name = origin.to_slash_string();
        let source = String::from_utf8(self.ports.templates.read(origin)?).map_err(|e| {
            ApplicationError::TemplateSource {
                origin: name.clone(),
                reason: format!("template is not valid UTF-8: {e}"),
            }
        })?;

        let rendered = self.ports.renderer.render(&name, &source, context)?;

        let output = match &self.ports.formatter {
            Some(formatter) if formatter.handles(dest) => match formatter.format(&rendered) {
                Ok(formatted) => formatted,
                Err(e) => {
                    debug!(path = %dest.display(), error = %e, "formatter rejected output, writing it unformatted");
                    rendered
                }
            },
            _ => rendered,
        };

        self.ports.filesystem.write_file(dest, output.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockFilesystem, MockReportStore, MockSourceFormatter, MockTemplateRenderer,
        MockTemplateSource,
    };
    use crate::domain::{FileKind, ProjectSettings};
    use serde_json::json;
    use std::sync::Mutex;

    fn spec(n: usize) -> GeneratorSpec {
        (0..n).fold(GeneratorSpec::new("pages", 1).selector("dev.port"), |spec, i| {
            spec.file(SourceFile::new(format!("page{i}.html.hbs"), FileKind::FullGen).unwrap())
        })
    }

    fn ports(
        fs: MockFilesystem,
        templates: MockTemplateSource,
        reports: MockReportStore,
        renderer: MockTemplateRenderer,
        formatter: Option<MockSourceFormatter>,
    ) -> GeneratorPorts {
        GeneratorPorts {
            filesystem: Arc::new(fs),
            templates: Arc::new(templates),
            reports: Arc::new(reports),
            renderer: Arc::new(renderer),
            formatter: formatter.map(|f| Arc::new(f) as Arc<dyn SourceFormatter>),
        }
    }

    #[test]
    fn mismatched_context_aborts_without_side_effects() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().times(0);
        fs.expect_write_file().times(0);

        let mut reports = MockReportStore::new();
        reports.expect_load().returning(|_| Ok(None));
        reports.expect_save().times(0);

        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().times(0);

        let mut generator = Generator::new(
            spec(3),
            &ProjectSettings::default(),
            "/project",
            ports(fs, MockTemplateSource::new(), reports, renderer, None),
        );

        let outcome = generator.generate(&RenderContext::PerFile(vec![json!(1), json!(2)]));
        assert_eq!(
            outcome,
            GenerateOutcome::Aborted {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn unreadable_report_starts_cold() {
        let mut reports = MockReportStore::new();
        reports.expect_load().returning(|name| {
            Err(ApplicationError::ReportStore {
                generator: name.to_string(),
                reason: "corrupt yaml".into(),
            }
            .into())
        });

        let generator = Generator::new(
            spec(1),
            &ProjectSettings::default(),
            "/project",
            ports(
                MockFilesystem::new(),
                MockTemplateSource::new(),
                reports,
                MockTemplateRenderer::new(),
                None,
            ),
        );

        assert!(generator.last_report().is_cold());
        assert!(generator.report().never_generated);
    }

    #[test]
    fn next_report_captures_selected_config() {
        let mut reports = MockReportStore::new();
        reports.expect_load().returning(|_| Ok(None));

        let generator = Generator::new(
            spec(1),
            &ProjectSettings::default(),
            "/project",
            ports(
                MockFilesystem::new(),
                MockTemplateSource::new(),
                reports,
                MockTemplateRenderer::new(),
                None,
            ),
        );

        assert_eq!(generator.next_report().config.get("dev.port"), Some(&json!(8100)));
        assert_eq!(generator.next_report().version, 1);
    }

    #[test]
    fn formatter_failure_falls_back_to_rendered_output() {
        let written: Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>> = Arc::default();
        let sink = Arc::clone(&written);

        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(move |path, bytes| {
            sink.lock().unwrap().push((path.to_path_buf(), bytes.to_vec()));
            Ok(())
        });
        fs.expect_exists().return_const(false);

        let mut templates = MockTemplateSource::new();
        templates
            .expect_read()
            .returning(|_| Ok(b"fn {{name}}(".to_vec()));

        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|_, _, _| Ok("fn main(".to_string()));

        let mut formatter = MockSourceFormatter::new();
        formatter.expect_handles().return_const(true);
        formatter.expect_format().returning(|_| {
            Err(ApplicationError::FormattingFailed {
                reason: "unexpected end of input".into(),
            }
            .into())
        });

        let mut reports = MockReportStore::new();
        reports.expect_load().returning(|_| Ok(None));
        reports.expect_save().times(1).returning(|_, _| Ok(()));

        let spec = GeneratorSpec::new("code", 1)
            .file(SourceFile::new("src/main.rs.hbs", FileKind::CorePart).unwrap());
        let mut generator = Generator::new(
            spec,
            &ProjectSettings::default(),
            "/project",
            ports(fs, templates, reports, renderer, Some(formatter)),
        );

        let outcome = generator.generate(&RenderContext::Shared(json!({ "name": "main" })));
        assert!(outcome.is_success());

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("/project/src/main.rs"));
        assert_eq!(written[0].1, b"fn main(".to_vec());
    }

    #[test]
    fn per_file_failure_is_recorded_and_report_still_saved() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_exists().return_const(false);

        let mut templates = MockTemplateSource::new();
        templates.expect_read().returning(|origin| {
            if origin.to_slash_string() == "page0.html.hbs" {
                Err(ApplicationError::OriginNotFound {
                    origin: origin.to_slash_string(),
                }
                .into())
            } else {
                Ok(b"<p>{{this}}</p>".to_vec())
            }
        });

        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|_, _, ctx| Ok(format!("<p>{ctx}</p>")));

        let mut reports = MockReportStore::new();
        reports.expect_load().returning(|_| Ok(None));
        reports.expect_save().times(1).returning(|_, _| Ok(()));

        let mut generator = Generator::new(
            spec(2),
            &ProjectSettings::default(),
            "/project",
            ports(fs, templates, reports, renderer, None),
        );

        let outcome = generator.generate(&RenderContext::PerFile(vec![json!("a"), json!("b")]));
        match outcome {
            GenerateOutcome::Completed { written, failures } => {
                assert_eq!(written, 1);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].path.to_slash_string(), "page0.html");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
