//! Live project configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{
    error::DomainError,
    selector::{Selector, SelectorSource, expect_bool, expect_port, expect_string},
};

/// Prefix for free-form values resolved by map lookup.
pub const VARS_PREFIX: &str = "vars.";

/// Settings read from the `settings` section of the project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub project_name: String,
    pub default_lang: String,
    pub dev: NetworkConfig,
    pub prod: NetworkConfig,
    pub features: Features,
    /// Arbitrary values for templates, addressed as `vars.<key>[.<key>...]`.
    pub vars: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub domain: String,
    pub port: u16,
    pub ipv6: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub gitignore: bool,
    pub docker: bool,
    pub i18n: bool,
    pub sass: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            project_name: "app".into(),
            default_lang: "en".into(),
            dev: NetworkConfig::default(),
            prod: NetworkConfig {
                domain: "example.org".into(),
                port: 443,
                ipv6: false,
            },
            features: Features {
                gitignore: true,
                ..Features::default()
            },
            vars: BTreeMap::new(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".into(),
            port: 8100,
            ipv6: false,
        }
    }
}

impl ProjectSettings {
    /// Whole settings as a render context.
    pub fn to_value(&self) -> Value {
        // Infallible for these field types.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

macro_rules! string_field {
    ($path:literal, $($field:ident).+) => {
        Selector {
            path: $path,
            get: |c: &ProjectSettings| Some(json!(c.$($field).+)),
            set: Some(|c: &mut ProjectSettings, v: Value| {
                c.$($field).+ = expect_string($path, v)?;
                Ok(())
            }),
        }
    };
}

macro_rules! bool_field {
    ($path:literal, $($field:ident).+) => {
        Selector {
            path: $path,
            get: |c: &ProjectSettings| Some(json!(c.$($field).+)),
            set: Some(|c: &mut ProjectSettings, v: Value| {
                c.$($field).+ = expect_bool($path, v)?;
                Ok(())
            }),
        }
    };
}

macro_rules! port_field {
    ($path:literal, $($field:ident).+) => {
        Selector {
            path: $path,
            get: |c: &ProjectSettings| Some(json!(c.$($field).+)),
            set: Some(|c: &mut ProjectSettings, v: Value| {
                c.$($field).+ = expect_port($path, v)?;
                Ok(())
            }),
        }
    };
}

static SETTINGS_SELECTORS: &[Selector<ProjectSettings>] = &[
    string_field!("project_name", project_name),
    string_field!("default_lang", default_lang),
    Selector {
        path: "dev",
        get: |c: &ProjectSettings| serde_json::to_value(&c.dev).ok(),
        set: None,
    },
    string_field!("dev.domain", dev.domain),
    port_field!("dev.port", dev.port),
    bool_field!("dev.ipv6", dev.ipv6),
    Selector {
        path: "prod",
        get: |c: &ProjectSettings| serde_json::to_value(&c.prod).ok(),
        set: None,
    },
    string_field!("prod.domain", prod.domain),
    port_field!("prod.port", prod.port),
    bool_field!("prod.ipv6", prod.ipv6),
    Selector {
        path: "features",
        get: |c: &ProjectSettings| serde_json::to_value(&c.features).ok(),
        set: None,
    },
    bool_field!("features.gitignore", features.gitignore),
    bool_field!("features.docker", features.docker),
    bool_field!("features.i18n", features.i18n),
    bool_field!("features.sass", features.sass),
    Selector {
        path: "vars",
        get: |c: &ProjectSettings| serde_json::to_value(&c.vars).ok(),
        set: None,
    },
];

impl SelectorSource for ProjectSettings {
    fn selectors() -> &'static [Selector<Self>] {
        SETTINGS_SELECTORS
    }

    fn resolve_dynamic(&self, path: &str) -> Option<Value> {
        let rest = path.strip_prefix(VARS_PREFIX)?;
        let mut segments = rest.split('.');
        let mut current = self.vars.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Only top-level `vars.<key>` entries can be assigned.
    fn assign_dynamic(&mut self, path: &str, value: Value) -> Result<(), DomainError> {
        match path.strip_prefix(VARS_PREFIX) {
            Some(key) if !key.is_empty() && !key.contains('.') => {
                self.vars.insert(key.to_string(), value);
                Ok(())
            }
            _ => Err(DomainError::UnknownSelector {
                path: path.to_string(),
            }),
        }
    }
}
