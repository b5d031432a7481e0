//! # Policy File Schema and Parsing
//!
//! This module defines the `.version-policy.yaml` file and how it is parsed.
//! Every field is optional; an absent file behaves like an empty one and
//! yields the default policy (`1.48.0-SNAPSHOT` / `1.48.0-alpha-SNAPSHOT`)
//! reading the `otel.stable` property.
//!
//! ```yaml
//! property: otel.stable
//! stable: 1.48.0-SNAPSHOT
//! alpha: 1.48.0-alpha-SNAPSHOT
//! projects:
//!   - aws-resources
//!   - messaging-wrappers:api
//! workspace: Cargo.toml
//! properties: gradle.properties
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_ALPHA_VERSION, DEFAULT_SIGNAL_PROPERTY, DEFAULT_STABLE_VERSION, PROPERTIES_FILE_NAME,
};
use crate::error::{Error, Result};
use crate::policy::VersionPolicy;

/// Parsed contents of a policy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Name of the property that flags a stable build.
    #[serde(default = "default_property")]
    pub property: String,
    /// Version used for stable builds.
    #[serde(default = "default_stable")]
    pub stable: String,
    /// Version used for every other build.
    #[serde(default = "default_alpha")]
    pub alpha: String,
    /// Subprojects listed by hand.
    #[serde(default)]
    pub projects: Vec<String>,
    /// Cargo workspace manifest to discover further subprojects from,
    /// relative to the policy file.
    #[serde(default)]
    pub workspace: Option<PathBuf>,
    /// Project-level properties file, relative to the policy file.
    ///
    /// Defaults to `gradle.properties`.
    #[serde(default)]
    pub properties: Option<PathBuf>,
}

fn default_property() -> String {
    DEFAULT_SIGNAL_PROPERTY.to_string()
}

fn default_stable() -> String {
    DEFAULT_STABLE_VERSION.to_string()
}

fn default_alpha() -> String {
    DEFAULT_ALPHA_VERSION.to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            property: default_property(),
            stable: default_stable(),
            alpha: default_alpha(),
            projects: Vec::new(),
            workspace: None,
            properties: None,
        }
    }
}

impl PolicyConfig {
    /// Build the validated `VersionPolicy`.
    pub fn policy(&self) -> Result<VersionPolicy> {
        VersionPolicy::new(&self.stable, &self.alpha)
    }

    /// The project-level properties file, resolved against `base_dir`.
    pub fn properties_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(
            self.properties
                .as_deref()
                .unwrap_or_else(|| Path::new(PROPERTIES_FILE_NAME)),
        )
    }

    /// The workspace manifest, resolved against `base_dir`.
    pub fn workspace_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.workspace.as_ref().map(|path| base_dir.join(path))
    }
}

/// Parse policy YAML. Empty or comment-only input gives the defaults.
pub fn parse(yaml_content: &str) -> Result<PolicyConfig> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;
    if value.is_null() {
        return Ok(PolicyConfig::default());
    }
    if !value.is_mapping() {
        return Err(Error::ConfigParse {
            message: "the policy file must be a mapping".to_string(),
            hint: Some("Start the file with 'stable:' and 'alpha:' keys".to_string()),
        });
    }

    serde_yaml::from_value(value).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: unknown_field_hint(&e.to_string()),
    })
}

fn unknown_field_hint(message: &str) -> Option<String> {
    message.contains("unknown field").then(|| {
        "Valid keys are: property, stable, alpha, projects, workspace, properties".to_string()
    })
}

/// Read and parse a policy file.
pub fn from_file(path: &Path) -> Result<PolicyConfig> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Read `path` if it exists, otherwise use the defaults.
pub fn load_or_default(path: &Path) -> Result<PolicyConfig> {
    if path.exists() {
        from_file(path)
    } else {
        log::debug!("Policy file {} not found, using defaults", path.display());
        Ok(PolicyConfig::default())
    }
}
