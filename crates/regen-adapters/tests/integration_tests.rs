//! End-to-end tests of the engine over the local filesystem adapters.

use std::fs;
use std::path::Path;

use regen_adapters::{
    ProjectLoader, builtin_project, local_ports, filesystem::LocalFilesystem,
    report_store::REPORT_DIR,
};
use regen_core::{
    application::{GenerateOutcome, GenerationService},
    domain::FileStatus,
};
use tempfile::TempDir;

fn starter(dir: &Path) -> GenerationService {
    builtin_project::install(&LocalFilesystem::new(), dir, false).unwrap();
    let project = ProjectLoader::new(dir).load().unwrap();
    let ports = local_ports(dir, &project.templates);
    GenerationService::new(project, dir, ports).unwrap()
}

fn statuses(service: &GenerationService, name: &str) -> Vec<(String, FileStatus)> {
    service
        .report(name)
        .unwrap()
        .entries
        .into_iter()
        .map(|e| (e.path.to_slash_string(), e.status))
        .collect()
}

#[test]
fn starter_project_generates_and_reports_clean() {
    let dir = TempDir::new().unwrap();
    let service = starter(dir.path());

    for name in service.resolve_names(&[]).unwrap() {
        let outcome = service.generate(&name).unwrap();
        assert!(outcome.is_success(), "{name}: {outcome:?}");
    }

    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.starts_with("# App"));
    assert!(dir.path().join("public/css/site.css").is_file());
    assert_eq!(
        fs::read_to_string(dir.path().join("pages/about.html")).unwrap(),
        "<h1>About</h1>\n<a href=\"about.html\">about</a>\n"
    );
    assert!(dir.path().join(REPORT_DIR).join("base_report.yml").is_file());

    for name in ["base", "gitignore", "pages"] {
        let report = service.report(name).unwrap();
        assert!(report.is_clean(), "{name}: {report:?}");
    }
}

#[test]
fn report_before_generation_is_never_generated() {
    let dir = TempDir::new().unwrap();
    let service = starter(dir.path());

    let report = service.report("base").unwrap();
    assert!(report.never_generated);
    assert!(report.entries.is_empty());
}

#[test]
fn edits_and_deletions_are_detected_on_disk() {
    let dir = TempDir::new().unwrap();
    let service = starter(dir.path());
    service.generate("base").unwrap();

    fs::write(dir.path().join("public/robots.txt"), "User-agent: bot\n").unwrap();
    fs::remove_file(dir.path().join("README.md")).unwrap();

    assert_eq!(
        statuses(&service, "base"),
        vec![
            ("src/main.rs".to_string(), FileStatus::Same),
            ("README.md".to_string(), FileStatus::Deleted),
            ("public".to_string(), FileStatus::Edited),
        ]
    );
}

#[test]
fn adding_a_file_to_a_copied_directory_is_an_edit() {
    let dir = TempDir::new().unwrap();
    let service = starter(dir.path());
    service.generate("base").unwrap();

    fs::write(dir.path().join("public/extra.txt"), "new").unwrap();

    let report = service.report("base").unwrap();
    assert_eq!(report.count(FileStatus::Edited), 1);
}

#[test]
fn regeneration_restores_drifted_files() {
    let dir = TempDir::new().unwrap();
    let service = starter(dir.path());
    service.generate("gitignore").unwrap();

    fs::write(dir.path().join(".gitignore"), "changed").unwrap();
    assert!(!service.report("gitignore").unwrap().is_clean());

    service.generate("gitignore").unwrap();
    assert!(service.report("gitignore").unwrap().is_clean());
}

#[test]
fn settings_change_is_reported_after_reload() {
    let dir = TempDir::new().unwrap();
    let service = starter(dir.path());
    service.generate("base").unwrap();

    let loader = ProjectLoader::new(dir.path());
    let mut project = loader.load().unwrap();
    project.settings.dev.port = 9000;
    loader.save_settings(&project.settings).unwrap();

    let reloaded = loader.load().unwrap();
    let ports = local_ports(dir.path(), &reloaded.templates);
    let service = GenerationService::new(reloaded, dir.path(), ports).unwrap();

    let report = service.report("base").unwrap();
    assert!(!report.notices.is_empty());
    assert!(report.entries.iter().all(|e| e.status == FileStatus::Same));
}

#[test]
fn per_file_mismatch_aborts_without_writing() {
    let dir = TempDir::new().unwrap();
    builtin_project::install(&LocalFilesystem::new(), dir.path(), false).unwrap();

    let loader = ProjectLoader::new(dir.path());
    let mut project = loader.load().unwrap();
    project.settings.vars.insert(
        "pages".into(),
        serde_json::json!([{ "title": "Only", "slug": "only" }]),
    );
    let ports = local_ports(dir.path(), &project.templates);
    let service = GenerationService::new(project, dir.path(), ports).unwrap();

    assert_eq!(
        service.generate("pages").unwrap(),
        GenerateOutcome::Aborted {
            expected: 2,
            got: 1
        }
    );
    assert!(!dir.path().join("pages").exists());
    assert!(!dir.path().join(REPORT_DIR).join("pages_report.yml").exists());
}
