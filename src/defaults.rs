//! Default values for version-policy configuration.
//!
//! This module provides centralized default values used across the library
//! and the commands, so the captured policy and the property names live in
//! one place.

use std::env;
use std::path::PathBuf;

/// Stable version used when no policy file overrides it.
pub const DEFAULT_STABLE_VERSION: &str = "1.48.0-SNAPSHOT";

/// Alpha version used when no policy file overrides it.
pub const DEFAULT_ALPHA_VERSION: &str = "1.48.0-alpha-SNAPSHOT";

/// Property that flags a build as stable.
pub const DEFAULT_SIGNAL_PROPERTY: &str = "otel.stable";

/// The only value of the signal property that selects the stable version.
pub const STABLE_SIGNAL_VALUE: &str = "true";

/// Policy file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".version-policy.yaml";

/// Name of the properties file read from the project and user directories.
pub const PROPERTIES_FILE_NAME: &str = "gradle.properties";

/// Environment variables with this prefix supply project properties.
pub const ENV_PROPERTY_PREFIX: &str = "ORG_GRADLE_PROJECT_";

/// Environment variable overriding the user-level properties directory.
pub const USER_HOME_ENV: &str = "GRADLE_USER_HOME";

/// Returns the user-level properties file path.
///
/// Uses `$GRADLE_USER_HOME/gradle.properties` when the variable is set and
/// non-empty, otherwise `~/.gradle/gradle.properties`. Returns `None` if no
/// home directory can be determined.
pub fn default_user_properties_path() -> Option<PathBuf> {
    user_properties_path(env::var_os(USER_HOME_ENV).map(PathBuf::from))
}

fn user_properties_path(user_home: Option<PathBuf>) -> Option<PathBuf> {
    user_home
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| dirs::home_dir().map(|home| home.join(".gradle")))
        .map(|dir| dir.join(PROPERTIES_FILE_NAME))
}
