//! # Resolve Command Implementation
//!
//! This module implements the `resolve` subcommand, which prints the version
//! the current build resolves to. By default the output is only the version
//! string followed by a newline, so it can be captured by scripts:
//!
//! ```bash
//! VERSION=$(version-policy resolve -P otel.stable=true)
//! ```
//!
//! This command never reads or touches the subproject list.

use anyhow::Result;
use clap::Args;

use version_policy::build::Build;
use version_policy::output::{channel_label, OutputConfig};

use super::apply::OutputFormat;
use super::PropertyArgs;

/// Print the version this build resolves to
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub properties: PropertyArgs,

    /// Also print which channel (stable or alpha) was selected
    #[arg(long)]
    pub channel: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, color_flag: &str) -> Result<()> {
    let build = Build::load(&args.properties.to_build_options())?;
    let resolved = build.resolve()?;

    match args.format {
        OutputFormat::Text if args.channel => {
            let out = OutputConfig::from_env_and_flag(color_flag);
            println!(
                "{} {}",
                channel_label(&out, resolved.channel()),
                resolved.version()
            );
        }
        OutputFormat::Text => println!("{}", resolved.version()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&resolved)?),
    }

    Ok(())
}
