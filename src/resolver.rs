//! # Version Resolution
//!
//! The `VersionResolver` turns a `ConfigSignal` into one version string and
//! writes it to every subproject of a `ProjectSet`.
//!
//! Resolution has exactly two outcomes. The stable version is chosen only
//! when the signal is present and exactly `true`; every other input, including
//! an absent property or an empty string, resolves to the alpha version. In
//! the default lenient mode this cannot fail.
//!
//! ```
//! use version_policy::policy::VersionPolicy;
//! use version_policy::project::ProjectSet;
//! use version_policy::resolver::{Channel, VersionResolver};
//! use version_policy::signal::ConfigSignal;
//!
//! let resolver = VersionResolver::new(VersionPolicy::default());
//! let mut projects = ProjectSet::from_names(["aws-resources", "messaging-wrappers"]).unwrap();
//!
//! let resolved = resolver.apply(&ConfigSignal::present("true"), &mut projects).unwrap();
//! assert_eq!(resolved.channel(), Channel::Stable);
//! assert_eq!(projects.common_version(), Some("1.48.0-SNAPSHOT"));
//! ```

use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::defaults::DEFAULT_SIGNAL_PROPERTY;
use crate::error::Result;
use crate::policy::VersionPolicy;
use crate::project::ProjectSet;
use crate::signal::{ConfigSignal, SignalMode};

/// Which of the two policy versions was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Alpha,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => write!(f, "stable"),
            Channel::Alpha => write!(f, "alpha"),
        }
    }
}

/// The outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    channel: Channel,
    version: String,
}

impl ResolvedVersion {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

/// Selects the build version from a policy and a signal.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    policy: VersionPolicy,
    property: String,
    mode: SignalMode,
}

impl VersionResolver {
    /// A lenient resolver reading `otel.stable`.
    pub fn new(policy: VersionPolicy) -> Self {
        Self {
            policy,
            property: DEFAULT_SIGNAL_PROPERTY.to_string(),
            mode: SignalMode::Lenient,
        }
    }

    /// Use a different signal property name (only affects messages).
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    pub fn with_mode(mut self, mode: SignalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn policy(&self) -> &VersionPolicy {
        &self.policy
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn mode(&self) -> SignalMode {
        self.mode
    }

    /// Resolve the version for `signal`.
    ///
    /// Only fails in strict mode, for a present value other than `true` or
    /// `false`.
    pub fn resolve(&self, signal: &ConfigSignal) -> Result<ResolvedVersion> {
        signal.validate(&self.property, self.mode)?;

        if signal.is_near_miss() {
            warn!(
                "Property '{}' is {} which is not exactly \"true\"; using the alpha version",
                self.property, signal
            );
        }

        let resolved = if signal.is_stable() {
            ResolvedVersion {
                channel: Channel::Stable,
                version: self.policy.stable_version().to_string(),
            }
        } else {
            ResolvedVersion {
                channel: Channel::Alpha,
                version: self.policy.alpha_version().to_string(),
            }
        };

        Ok(resolved)
    }

    /// Resolve once and assign the result to every subproject.
    ///
    /// Any version a subproject held before is overwritten. Nothing is
    /// written if resolution fails.
    pub fn apply(&self, signal: &ConfigSignal, projects: &mut ProjectSet) -> Result<ResolvedVersion> {
        let resolved = self.resolve(signal)?;
        projects.assign_version(resolved.version());
        info!(
            "Resolved {} version {} for {} subproject(s)",
            resolved.channel(),
            resolved.version(),
            projects.len()
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn projects() -> ProjectSet {
        ProjectSet::from_names(["aws-resources", "messaging-wrappers:api", "jmx-scraper"]).unwrap()
    }

    #[test]
    fn test_scenario_stable_signal() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        let mut set = projects();

        let resolved = resolver.apply(&ConfigSignal::present("true"), &mut set).unwrap();
        assert_eq!(resolved.channel(), Channel::Stable);
        assert_eq!(resolved.version(), "1.48.0-SNAPSHOT");
        assert!(set.iter().all(|p| p.version() == Some("1.48.0-SNAPSHOT")));
    }

    #[test]
    fn test_scenario_absent_signal() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        let mut set = projects();

        let resolved = resolver.apply(&ConfigSignal::absent(), &mut set).unwrap();
        assert_eq!(resolved.channel(), Channel::Alpha);
        assert_eq!(set.common_version(), Some("1.48.0-alpha-SNAPSHOT"));
    }

    #[test]
    fn test_scenario_false_signal() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        let mut set = projects();

        resolver.apply(&ConfigSignal::present("false"), &mut set).unwrap();
        assert_eq!(set.common_version(), Some("1.48.0-alpha-SNAPSHOT"));
    }

    #[test]
    fn test_non_exact_spellings_resolve_to_alpha() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        for value in ["", "TRUE", "True", "1", "yes", " true", "true "] {
            let resolved = resolver.resolve(&ConfigSignal::present(value)).unwrap();
            assert_eq!(resolved.channel(), Channel::Alpha, "value {:?}", value);
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        let signal = ConfigSignal::present("true");
        assert_eq!(
            resolver.resolve(&signal).unwrap(),
            resolver.resolve(&signal).unwrap()
        );
    }

    #[test]
    fn test_apply_overwrites_previous_versions() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        let mut set = projects();

        resolver.apply(&ConfigSignal::present("true"), &mut set).unwrap();
        resolver.apply(&ConfigSignal::absent(), &mut set).unwrap();
        assert_eq!(set.common_version(), Some("1.48.0-alpha-SNAPSHOT"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = VersionPolicy::new("2.3.0", "2.3.0-alpha-SNAPSHOT").unwrap();
        let resolver = VersionResolver::new(policy);
        let resolved = resolver.resolve(&ConfigSignal::present("true")).unwrap();
        assert_eq!(resolved.to_string(), "2.3.0");
    }

    #[test]
    fn test_strict_mode_rejects_and_leaves_projects_untouched() {
        let resolver = VersionResolver::new(VersionPolicy::default())
            .with_property("release.stable")
            .with_mode(SignalMode::Strict);
        let mut set = projects();

        let err = resolver.apply(&ConfigSignal::present("yes"), &mut set).unwrap_err();
        assert!(matches!(err, Error::InvalidSignal { ref property, .. } if property == "release.stable"));
        assert!(set.iter().all(|p| p.version().is_none()));
    }

    #[test]
    fn test_strict_mode_still_defaults_absent_to_alpha() {
        let resolver = VersionResolver::new(VersionPolicy::default()).with_mode(SignalMode::Strict);
        let resolved = resolver.resolve(&ConfigSignal::absent()).unwrap();
        assert_eq!(resolved.channel(), Channel::Alpha);
    }

    #[test]
    fn test_near_miss_is_logged() {
        testing_logger::setup();
        let resolver = VersionResolver::new(VersionPolicy::default());
        resolver.resolve(&ConfigSignal::present("True")).unwrap();
        testing_logger::validate(|captured_logs| {
            assert!(captured_logs.iter().any(|log| {
                log.level == log::Level::Warn && log.body.contains("not exactly \"true\"")
            }));
        });
    }

    #[test]
    fn test_apply_logs_resolution() {
        testing_logger::setup();
        let resolver = VersionResolver::new(VersionPolicy::default());
        let mut set = projects();
        resolver.apply(&ConfigSignal::absent(), &mut set).unwrap();
        testing_logger::validate(|captured_logs| {
            assert!(captured_logs.iter().any(|log| {
                log.level == log::Level::Info
                    && log.body == "Resolved alpha version 1.48.0-alpha-SNAPSHOT for 3 subproject(s)"
            }));
        });
    }

    #[test]
    fn test_channel_serializes_lowercase() {
        let resolver = VersionResolver::new(VersionPolicy::default());
        let resolved = resolver.resolve(&ConfigSignal::present("true")).unwrap();
        let json = serde_json::to_string(&resolved).unwrap();
        assert_eq!(json, r#"{"channel":"stable","version":"1.48.0-SNAPSHOT"}"#);
    }
}
