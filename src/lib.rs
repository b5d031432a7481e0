//! # Version Policy Library
//!
//! This library resolves the single version string a multi-module build
//! publishes under. A build is either flagged as stable, by setting the
//! `otel.stable` property to exactly `true`, or it is not; the first case
//! selects the policy's stable version and every other case selects its
//! alpha version. The chosen string is then assigned to every subproject.
//!
//! ## Quick Example
//!
//! ```
//! use version_policy::policy::VersionPolicy;
//! use version_policy::project::ProjectSet;
//! use version_policy::resolver::VersionResolver;
//! use version_policy::signal::ConfigSignal;
//!
//! let resolver = VersionResolver::new(VersionPolicy::default());
//! let mut projects = ProjectSet::from_names(["aws-resources", "jmx-scraper"]).unwrap();
//!
//! // "TRUE" is not "true": this is an alpha build
//! resolver.apply(&ConfigSignal::present("TRUE"), &mut projects).unwrap();
//! assert_eq!(projects.common_version(), Some("1.48.0-alpha-SNAPSHOT"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Policy (`policy`, `config`)**: the stable/alpha version pair, loaded
//!   from `.version-policy.yaml` or the built-in defaults.
//! - **Signal (`signal`, `properties`)**: the raw value of the stable-build
//!   property, looked up through layered property sources.
//! - **Subprojects (`project`)**: the build's modules, listed by hand or
//!   discovered from a Cargo workspace.
//! - **Resolution (`resolver`, `build`)**: one resolution per build, applied
//!   to every subproject.

pub mod build;
pub mod config;
pub mod defaults;
pub mod error;
pub mod output;
pub mod policy;
pub mod project;
pub mod properties;
pub mod resolver;
pub mod signal;

#[cfg(test)]
mod signal_proptest;
