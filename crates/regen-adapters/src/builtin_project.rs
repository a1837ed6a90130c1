//! Built-in starter project written by `regen init`.
//!
//! The starter ships a project file and a handful of templates under
//! `.regen/templates` covering every file kind and a per-file generator.

use std::path::{Path, PathBuf};

use regen_core::{application::ports::Filesystem, domain::DEFAULT_TEMPLATES_DIR, error::RegenResult};
use tracing::{debug, instrument};

use crate::project_loader::PROJECT_FILE;

/// Starter `.regen/project.yml`.
pub const STARTER_PROJECT: &str = r#"settings:
  project_name: app
  default_lang: en
  dev: { domain: localhost, port: 8100, ipv6: false }
  prod: { domain: example.org, port: 443, ipv6: false }
  features: { gitignore: true, docker: false, i18n: false, sass: false }
  vars:
    pages:
      - { title: Home, slug: index }
      - { title: About, slug: about }
templates: .regen/templates
generators:
  - name: base
    version: 1
    selectors: [project_name, dev]
    files:
      - { origin: main.rs.hbs, path: src/main.rs, kind: core-part }
      - { origin: README.md.hbs, kind: skeleton }
      - { origin: static, path: public, kind: copy }
  - name: gitignore
    version: 1
    selectors: [features]
    files:
      - { origin: gitignore.hbs, path: .gitignore, kind: full-gen }
  - name: pages
    version: 1
    selectors: [vars.pages]
    context: vars.pages
    per_file: true
    files:
      - { origin: page.html.hbs, path: pages/index.html, kind: full-gen }
      - { origin: page.html.hbs, path: pages/about.html, kind: full-gen }
watch:
  - root: .regen/templates
    include: ['.*\.hbs$']
    delay_ms: 200
    generate: [base, pages]
"#;

/// Starter templates, relative to the templates directory.
pub const STARTER_TEMPLATES: &[(&str, &str)] = &[
    (
        "main.rs.hbs",
        r#"//! {{project_name}}

const DOMAIN: &str = "{{dev.domain}}";
const PORT: u16 = {{dev.port}};

fn main() {
    println!("{{project_name}} listening on http://{}:{}", DOMAIN, PORT);
}
"#,
    ),
    (
        "README.md.hbs",
        "# {{Upper project_name}}\n\nServed on {{dev.domain}}:{{dev.port}} in development.\n",
    ),
    (
        "gitignore.hbs",
        "/target\n{{#if features.docker}}/.docker\n{{/if}}",
    ),
    ("page.html.hbs", "<h1>{{title}}</h1>\n<a href=\"{{slug}}.html\">{{slug}}</a>\n"),
    ("static/css/site.css", "body { font-family: sans-serif; }\n"),
    ("static/robots.txt", "User-agent: *\n"),
];

/// Files touched by [`install`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write the starter project under `root`. Existing files are kept unless
/// `force` is set.
#[instrument(skip(fs), fields(root = %root.display()))]
pub fn install(fs: &dyn Filesystem, root: &Path, force: bool) -> RegenResult<InstallSummary> {
    let mut summary = InstallSummary::default();

    let templates = root.join(DEFAULT_TEMPLATES_DIR);
    let entries = std::iter::once((root.join(PROJECT_FILE), STARTER_PROJECT)).chain(
        STARTER_TEMPLATES
            .iter()
            .map(|(origin, body)| (templates.join(origin), *body)),
    );

    for (path, body) in entries {
        if fs.exists(&path) && !force {
            debug!(path = %path.display(), "keeping existing file");
            summary.skipped.push(path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.write_file(&path, body.as_bytes())?;
        summary.written.push(path);
    }

    Ok(summary)
}
