//! # Build Configuration Phase
//!
//! This module plays the build driver's part: it gathers everything one
//! build invocation needs into a `Build` value and then resolves the version
//! exactly once.
//!
//! ## Process
//!
//! 1.  **Policy**: Load `.version-policy.yaml` (or the defaults) and validate
//!     the stable and alpha versions.
//! 2.  **Properties**: Stack the command line, environment, user and project
//!     property layers.
//! 3.  **Subprojects**: Collect the listed subprojects, then any discovered
//!     from the workspace manifest.
//! 4.  **Resolution**: Read the signal property once, resolve it and assign
//!     the result to every subproject.
//!
//! A `Build` is constructed once and passed explicitly; nothing here is
//! global state.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{self, PolicyConfig};
use crate::defaults::{default_user_properties_path, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::project::{discover_workspace_members, ProjectSet};
use crate::properties::{
    CommandLineProperties, EnvironmentProperties, LayeredProperties, PropertiesFile,
};
use crate::resolver::{ResolvedVersion, VersionResolver};
use crate::signal::{ConfigSignal, SignalMode};

/// Inputs for one build invocation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Policy file. A missing file means the defaults.
    pub config_path: PathBuf,
    /// Raw `-P` arguments.
    pub cli_properties: Vec<String>,
    /// Overrides the project properties file named by the policy.
    pub properties_file: Option<PathBuf>,
    /// Overrides the user properties file. `None` uses the default location.
    pub user_properties_file: Option<PathBuf>,
    /// Whether `ORG_GRADLE_PROJECT_*` variables and the user properties file
    /// are consulted.
    pub use_environment: bool,
    pub mode: SignalMode,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            cli_properties: Vec::new(),
            properties_file: None,
            user_properties_file: None,
            use_environment: true,
            mode: SignalMode::Lenient,
        }
    }
}

/// The outcome of `Build::apply`: the signal as read, the version it
/// resolved to, and the versioned subprojects.
#[derive(Debug, Clone)]
pub struct Applied {
    pub signal: ConfigSignal,
    pub resolved: ResolvedVersion,
    pub projects: ProjectSet,
}

/// Everything one invocation needs to resolve its version.
pub struct Build {
    config: PolicyConfig,
    base_dir: PathBuf,
    resolver: VersionResolver,
    properties: LayeredProperties,
}

impl Build {
    /// Load the policy and property layers described by `options`.
    pub fn load(options: &BuildOptions) -> Result<Self> {
        let config = config::load_or_default(&options.config_path)?;
        let base_dir = base_dir_of(&options.config_path);

        let resolver = VersionResolver::new(config.policy()?)
            .with_property(config.property.clone())
            .with_mode(options.mode);

        let mut properties = LayeredProperties::new()
            .with_layer(CommandLineProperties::parse(&options.cli_properties)?);

        if options.use_environment {
            properties = properties.with_layer(EnvironmentProperties::from_env());
            let user_file = options
                .user_properties_file
                .clone()
                .or_else(default_user_properties_path);
            if let Some(path) = user_file {
                properties = properties.with_layer(PropertiesFile::load_if_exists(path)?);
            }
        }

        let project_file = options
            .properties_file
            .clone()
            .unwrap_or_else(|| config.properties_path(&base_dir));
        properties = properties.with_layer(PropertiesFile::load_if_exists(project_file)?);

        debug!("Property layers: {}", properties.len());

        Ok(Self {
            config,
            base_dir,
            resolver,
            properties,
        })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// The signal as the property layers report it.
    pub fn signal(&self) -> ConfigSignal {
        self.properties.signal(self.resolver.property())
    }

    /// Resolve the version without touching any subprojects.
    pub fn resolve(&self) -> Result<ResolvedVersion> {
        self.resolver.resolve(&self.signal())
    }

    /// Collect the subprojects: listed ones first, then discovered ones.
    pub fn projects(&self) -> Result<ProjectSet> {
        let mut projects = ProjectSet::from_names(self.config.projects.iter().cloned())?;

        if let Some(manifest) = self.config.workspace_path(&self.base_dir) {
            for name in discover_workspace_members(&manifest)? {
                if projects.get(&name).is_none() {
                    projects.add(name)?;
                }
            }
        }

        Ok(projects)
    }

    /// Collect the subprojects and assign the resolved version to all of them.
    ///
    /// The signal property is read once; the returned `Applied` carries that
    /// reading for reporting.
    pub fn apply(&self) -> Result<Applied> {
        let mut projects = self.projects()?;
        if projects.is_empty() {
            return Err(Error::NoSubprojects {
                hint: Some(
                    "List subprojects under 'projects:' or point 'workspace:' at a Cargo.toml"
                        .to_string(),
                ),
            });
        }

        let signal = self.signal();
        let resolved = self.resolver.apply(&signal, &mut projects)?;
        Ok(Applied {
            signal,
            resolved,
            projects,
        })
    }
}

fn base_dir_of(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
