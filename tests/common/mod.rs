//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_policy(configs::WITH_PROJECTS);
//!     fixture.cmd().arg("apply").assert().success();
//! }
//! ```

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common policy file snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Three hand-listed subprojects, default versions.
    pub const WITH_PROJECTS: &str = r#"
projects:
  - aws-resources
  - messaging-wrappers:api
  - jmx-scraper
"#;

    /// Custom versions and property name.
    pub const CUSTOM: &str = r#"
property: release.stable
stable: 2.1.0
alpha: 2.1.0-alpha-SNAPSHOT
projects: [core, cli]
"#;

    /// Discover subprojects from a Cargo workspace.
    pub const WORKSPACE: &str = r#"
workspace: Cargo.toml
"#;

    /// Version without a patch component.
    pub const INVALID_VERSION: &str = "stable: 1.48-SNAPSHOT\n";

    /// Misspelled key.
    pub const UNKNOWN_KEY: &str = "stabel: 1.48.0-SNAPSHOT\n";

    /// Valid policy with no subprojects.
    pub const EMPTY: &str = "# version-policy configuration\n";
}

/// A temporary project directory plus a preconfigured command.
pub struct TestFixture {
    pub temp: TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        temp.child("gradle-home").create_dir_all().unwrap();
        Self { temp }
    }

    /// Write `.version-policy.yaml`.
    pub fn with_policy(self, content: &str) -> Self {
        self.temp
            .child(".version-policy.yaml")
            .write_str(content)
            .unwrap();
        self
    }

    /// Write the project-level `gradle.properties`.
    pub fn with_project_properties(self, content: &str) -> Self {
        self.temp
            .child("gradle.properties")
            .write_str(content)
            .unwrap();
        self
    }

    /// Write the user-level `gradle.properties` (under `GRADLE_USER_HOME`).
    pub fn with_user_properties(self, content: &str) -> Self {
        self.temp
            .child("gradle-home/gradle.properties")
            .write_str(content)
            .unwrap();
        self
    }

    /// Write a file relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp.child(path).write_str(content).unwrap();
        self
    }

    /// The binary, run inside the fixture with an isolated environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("version-policy");
        cmd.current_dir(self.temp.path())
            .env("GRADLE_USER_HOME", self.temp.child("gradle-home").path())
            .env("NO_COLOR", "1")
            .env_remove("ORG_GRADLE_PROJECT_otel.stable")
            .env_remove("ORG_GRADLE_PROJECT_release.stable")
            .env_remove("VERSION_POLICY_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}
