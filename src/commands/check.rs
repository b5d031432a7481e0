//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, which validates a
//! `.version-policy.yaml` file without resolving anything.
//!
//! ## Functionality
//!
//! - **Schema**: The file must parse and contain only known keys.
//! - **Versions**: Both versions must have the
//!   `MAJOR.MINOR.PATCH[-SNAPSHOT|-alpha-SNAPSHOT]` shape.
//! - **Subprojects**: Listed names must be unique and the workspace manifest,
//!   if any, must be readable.
//!
//! Suspicious but valid settings (no subprojects, identical versions,
//! different release cores) are reported as warnings; `--deny-warnings` turns
//! them into a failure.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use version_policy::build::{Build, BuildOptions};
use version_policy::config::PolicyConfig;
use version_policy::output::{emoji, OutputConfig};
use version_policy::policy::parse_policy_version;

/// Validate a .version-policy.yaml file
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the .version-policy.yaml file to check.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = ".version-policy.yaml",
        env = "VERSION_POLICY_CONFIG"
    )]
    pub config: PathBuf,

    /// Fail on warnings as well as errors.
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = &args.config;

    if !config_path.exists() {
        anyhow::bail!("Policy file not found: {}", config_path.display());
    }

    println!(
        "{} Checking policy: {}",
        emoji(&out, "🔍", "[SCAN]"),
        config_path.display()
    );

    let options = BuildOptions {
        config_path: config_path.clone(),
        use_environment: false,
        ..BuildOptions::default()
    };
    let build = Build::load(&options)?;
    let projects = build.projects()?;
    let config = build.config();

    println!("   Property: {}", config.property);
    println!("   Stable:   {}", config.stable);
    println!("   Alpha:    {}", config.alpha);
    println!("   Subprojects: {}", projects.len());

    let warnings = collect_warnings(config, projects.len());
    for warning in &warnings {
        println!("{} {}", emoji(&out, "⚠️ ", "[WARN]"), warning);
    }

    if args.deny_warnings && !warnings.is_empty() {
        anyhow::bail!("{} warning(s) with --deny-warnings", warnings.len());
    }

    println!("{} Policy is valid", emoji(&out, "✅", "[OK]"));
    Ok(())
}

fn collect_warnings(config: &PolicyConfig, project_count: usize) -> Vec<String> {
    let mut warnings = Vec::new();

    if project_count == 0 {
        warnings.push("No subprojects listed or discovered; 'apply' will fail".to_string());
    }

    if config.stable == config.alpha {
        warnings.push("Stable and alpha versions are identical".to_string());
    } else if let (Ok(stable), Ok(alpha)) = (
        parse_policy_version(&config.stable),
        parse_policy_version(&config.alpha),
    ) {
        if (stable.major, stable.minor, stable.patch) != (alpha.major, alpha.minor, alpha.patch) {
            warnings.push(format!(
                "Stable {} and alpha {} have different release cores",
                config.stable, config.alpha
            ));
        }
    }

    warnings
}
