//! # CLI Command Implementations
//!
//! Each subcommand of the `version-policy` tool lives in its own file with an
//! `Args` struct (derived using `clap`) and an `execute` function that calls
//! into the `version_policy` library.
//!
//! `resolve` and `apply` share the property options defined here.

pub mod apply;
pub mod check;
pub mod completions;
pub mod resolve;

use clap::Args;
use std::path::PathBuf;

use version_policy::build::BuildOptions;
use version_policy::signal::SignalMode;

/// Options controlling where the policy and the signal come from
#[derive(Args, Debug, Clone)]
pub struct PropertyArgs {
    /// Path to the .version-policy.yaml file. Defaults apply if it is missing.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = ".version-policy.yaml",
        env = "VERSION_POLICY_CONFIG"
    )]
    pub config: PathBuf,

    /// Set a project property (repeatable), e.g. -P otel.stable=true
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Project properties file. Defaults to gradle.properties next to the policy file.
    #[arg(long = "properties", value_name = "FILE")]
    pub properties_file: Option<PathBuf>,

    /// User properties file. Defaults to $GRADLE_USER_HOME/gradle.properties.
    #[arg(long, value_name = "FILE")]
    pub user_properties: Option<PathBuf>,

    /// Ignore ORG_GRADLE_PROJECT_* variables and the user properties file.
    #[arg(long)]
    pub no_env: bool,

    /// Fail unless the signal is absent, exactly "true" or exactly "false".
    #[arg(long)]
    pub strict: bool,
}

impl PropertyArgs {
    pub fn to_build_options(&self) -> BuildOptions {
        BuildOptions {
            config_path: self.config.clone(),
            cli_properties: self.properties.clone(),
            properties_file: self.properties_file.clone(),
            user_properties_file: self.user_properties.clone(),
            use_environment: !self.no_env,
            mode: if self.strict {
                SignalMode::Strict
            } else {
                SignalMode::Lenient
            },
        }
    }
}
