//! Apply command implementation
//!
//! The apply command runs the whole configuration phase for one build:
//! 1. Load the policy and the property layers
//! 2. Collect the subprojects (listed and discovered)
//! 3. Read the signal once and resolve the version
//! 4. Assign it to every subproject and report the result
//!
//! Nothing is written to disk; the report goes to stdout.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use version_policy::build::{Applied, Build};
use version_policy::output::{channel_label, emoji, OutputConfig};
use version_policy::project::ProjectSet;
use version_policy::resolver::{Channel, ResolvedVersion};

use super::PropertyArgs;

/// Report formats shared by `resolve` and `apply`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub properties: PropertyArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct ApplyReport<'a> {
    property: &'a str,
    signal: Option<String>,
    channel: Channel,
    version: &'a str,
    projects: &'a ProjectSet,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, color_flag: &str) -> Result<()> {
    let build = Build::load(&args.properties.to_build_options())?;
    let Applied {
        signal,
        resolved,
        projects,
    } = build.apply()?;

    if !projects.is_consistent() {
        anyhow::bail!(
            "Subprojects ended up with different versions after resolving {}",
            resolved.version()
        );
    }

    if args.quiet {
        return Ok(());
    }

    let report = ApplyReport {
        property: build.resolver().property(),
        signal: signal.value().map(str::to_string),
        channel: resolved.channel(),
        version: resolved.version(),
        projects: &projects,
    };

    match args.format {
        OutputFormat::Text => {
            let out = OutputConfig::from_env_and_flag(color_flag);
            print_text(&out, &report, &resolved, &signal.to_string());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
    }

    Ok(())
}

fn print_text(out: &OutputConfig, report: &ApplyReport<'_>, resolved: &ResolvedVersion, signal: &str) {
    println!(
        "{} Resolved {} version {} ({} = {})",
        emoji(out, "✅", "[OK]"),
        channel_label(out, resolved.channel()),
        resolved.version(),
        report.property,
        signal
    );

    let width = report
        .projects
        .iter()
        .map(|p| p.name().len())
        .max()
        .unwrap_or(0);
    for project in report.projects.iter() {
        println!(
            "   {:<width$}  {}",
            project.name(),
            project.version().unwrap_or("-"),
            width = width
        );
    }

    println!("{} subproject(s) updated", report.projects.len());
}
