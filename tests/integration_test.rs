//! Integration tests for the `version_policy` library API.
//!
//! These tests drive the public API the way a build driver would: load the
//! build once, resolve once, and hand the versioned subprojects downstream.

use std::fs;
use std::path::Path;

use serial_test::serial;
use tempfile::TempDir;
use version_policy::build::{Build, BuildOptions};
use version_policy::policy::VersionPolicy;
use version_policy::project::ProjectSet;
use version_policy::properties::{CommandLineProperties, LayeredProperties, PropertiesFile};
use version_policy::resolver::{Channel, VersionResolver};
use version_policy::signal::ConfigSignal;

fn options_in(dir: &Path) -> BuildOptions {
    BuildOptions {
        config_path: dir.join(".version-policy.yaml"),
        user_properties_file: Some(dir.join("no-such-user.properties")),
        ..BuildOptions::default()
    }
}

#[test]
fn test_scenarios_through_property_layers() {
    let policy = VersionPolicy::default();
    let resolver = VersionResolver::new(policy);

    let cases: [(&[&str], &str); 3] = [
        (&["otel.stable=true"], "1.48.0-SNAPSHOT"),
        (&[], "1.48.0-alpha-SNAPSHOT"),
        (&["otel.stable=false"], "1.48.0-alpha-SNAPSHOT"),
    ];

    for (arguments, expected) in cases {
        let layers = LayeredProperties::new()
            .with_layer(CommandLineProperties::parse(arguments.iter()).unwrap());
        let mut projects = ProjectSet::from_names(["a", "b", "c", "d"]).unwrap();

        resolver
            .apply(&layers.signal("otel.stable"), &mut projects)
            .unwrap();
        assert_eq!(projects.common_version(), Some(expected), "{:?}", arguments);
    }
}

#[test]
fn test_properties_file_layer_drives_resolution() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("gradle.properties");
    fs::write(&path, "# release build\notel.stable = true\n").unwrap();

    let layers = LayeredProperties::new().with_layer(PropertiesFile::load_if_exists(&path).unwrap());
    let resolver = VersionResolver::new(VersionPolicy::default());
    let resolved = resolver.resolve(&layers.signal("otel.stable")).unwrap();
    assert_eq!(resolved.channel(), Channel::Stable);
}

#[test]
#[serial]
fn test_environment_layer_is_read_by_build() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".version-policy.yaml"), "projects: [core]\n").unwrap();

    std::env::set_var("ORG_GRADLE_PROJECT_otel.stable", "true");
    let build = Build::load(&options_in(temp.path()));
    std::env::remove_var("ORG_GRADLE_PROJECT_otel.stable");

    let applied = build.unwrap().apply().unwrap();
    assert_eq!(applied.signal, ConfigSignal::present("true"));
    assert_eq!(applied.resolved.version(), "1.48.0-SNAPSHOT");
    assert_eq!(
        applied.projects.get("core").unwrap().version(),
        Some("1.48.0-SNAPSHOT")
    );
}

#[test]
#[serial]
fn test_environment_layer_is_skipped_when_disabled() {
    let temp = TempDir::new().unwrap();

    std::env::set_var("ORG_GRADLE_PROJECT_otel.stable", "true");
    let mut options = options_in(temp.path());
    options.use_environment = false;
    let build = Build::load(&options);
    std::env::remove_var("ORG_GRADLE_PROJECT_otel.stable");

    assert_eq!(build.unwrap().signal(), ConfigSignal::absent());
}

#[test]
#[serial]
fn test_build_resolves_once_for_all_consumers() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".version-policy.yaml"),
        "projects: [sdk, exporter, sampler]\n",
    )
    .unwrap();

    let build = Build::load(&options_in(temp.path())).unwrap();
    let applied = build.apply().unwrap();
    let second = build.resolve().unwrap();

    assert_eq!(applied.resolved, second);
    assert!(applied.projects.is_consistent());
    assert_eq!(applied.projects.len(), 3);
}
