//! # Version Policy
//!
//! A `VersionPolicy` is the pair of version strings a build can choose
//! between: the stable version, published only when the build is explicitly
//! flagged as stable, and the alpha version used for every other build.
//!
//! Both strings must have the shape `MAJOR.MINOR.PATCH`, optionally followed by
//! `-SNAPSHOT` or `-alpha-SNAPSHOT`. The shape is checked with `semver` when
//! the policy is constructed; once built, a policy is never mutated.

use log::warn;
use semver::{BuildMetadata, Version};

use crate::defaults::{DEFAULT_ALPHA_VERSION, DEFAULT_STABLE_VERSION};
use crate::error::{Error, Result};

/// Pre-release suffixes a policy version may carry.
const ALLOWED_PRE_RELEASES: [&str; 3] = ["", "SNAPSHOT", "alpha-SNAPSHOT"];

/// The two version strings a build resolves between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPolicy {
    stable_version: String,
    alpha_version: String,
}

impl VersionPolicy {
    /// Build a policy after checking both versions have the expected shape.
    pub fn new(stable_version: impl Into<String>, alpha_version: impl Into<String>) -> Result<Self> {
        let stable_version = stable_version.into();
        let alpha_version = alpha_version.into();

        let stable = parse_policy_version(&stable_version)?;
        let alpha = parse_policy_version(&alpha_version)?;

        if (stable.major, stable.minor, stable.patch) != (alpha.major, alpha.minor, alpha.patch) {
            warn!(
                "Stable version {} and alpha version {} have different release cores",
                stable_version, alpha_version
            );
        }
        if stable_version == alpha_version {
            warn!(
                "Stable and alpha versions are both {}; the stable flag will have no effect",
                stable_version
            );
        }

        Ok(Self {
            stable_version,
            alpha_version,
        })
    }

    /// The version used when the build is flagged as stable.
    pub fn stable_version(&self) -> &str {
        &self.stable_version
    }

    /// The version used for every other build.
    pub fn alpha_version(&self) -> &str {
        &self.alpha_version
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            stable_version: DEFAULT_STABLE_VERSION.to_string(),
            alpha_version: DEFAULT_ALPHA_VERSION.to_string(),
        }
    }
}

/// Parse a single policy version and check its pre-release suffix.
pub fn parse_policy_version(version: &str) -> Result<Version> {
    let parsed = Version::parse(version).map_err(|e| Error::InvalidVersion {
        version: version.to_string(),
        message: e.to_string(),
    })?;

    if parsed.build != BuildMetadata::EMPTY {
        return Err(Error::InvalidVersion {
            version: version.to_string(),
            message: "build metadata is not allowed".to_string(),
        });
    }

    if !ALLOWED_PRE_RELEASES.contains(&parsed.pre.as_str()) {
        return Err(Error::InvalidVersion {
            version: version.to_string(),
            message: format!(
                "unsupported suffix '-{}' (expected none, '-SNAPSHOT' or '-alpha-SNAPSHOT')",
                parsed.pre
            ),
        });
    }

    Ok(parsed)
}
