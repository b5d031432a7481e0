//! # Error Handling
//!
//! This module defines the centralized error type for the `version-policy`
//! library. It uses `thiserror` to build a single `Error` enum whose variants
//! carry enough context to produce a useful message on their own.
//!
//! Version resolution itself never fails. Every variant here belongs to the
//! collaborator boundary around it:
//!
//! - Reading and parsing the `.version-policy.yaml` policy file.
//! - Reading Java-style `.properties` files and `-P KEY=VALUE` arguments.
//! - Discovering subprojects from a Cargo workspace manifest.
//! - Validating the shape of the stable and alpha version strings.
//! - Rejecting malformed signals when strict mode is enabled.
//!
//! The `Result<T>` alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for version-policy operations
#[derive(Error, Debug)]
pub enum Error {
    /// The `.version-policy.yaml` file could not be understood.
    ///
    /// Optionally carries a hint about how to fix the file.
    #[error("Policy configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A `-P` argument was not of the form `KEY=VALUE`.
    #[error("Invalid property argument '{argument}': expected KEY=VALUE")]
    PropertyArgument { argument: String },

    /// A `.properties` file could not be read or parsed.
    #[error("Properties file error in {}: {message}", path.display())]
    PropertiesFile { path: PathBuf, message: String },

    /// The subproject list could not be built from a workspace manifest.
    #[error("Workspace discovery error in {}: {message}", path.display())]
    Workspace { path: PathBuf, message: String },

    /// A policy version does not have the `MAJOR.MINOR.PATCH[-SNAPSHOT|-alpha-SNAPSHOT]` shape.
    #[error("Invalid policy version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// Strict mode only: the signal was present but neither `true` nor `false`.
    #[error("Invalid value '{value}' for property '{property}': strict mode accepts only 'true' or 'false'")]
    InvalidSignal { property: String, value: String },

    /// The same subproject name was declared more than once.
    #[error("Duplicate subproject: {name}")]
    DuplicateSubproject { name: String },

    /// There is nothing to apply a version to.
    #[error("No subprojects found{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    NoSubprojects { hint: Option<String> },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
