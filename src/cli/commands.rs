//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_NAMESPACE, Release};

/// Auto-deploy - Manifest-shape resolver for the `auto-deploy-app` chart.
#[derive(Parser, Debug)]
#[command(name = "auto-deploy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, yaml).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the manifest intents of a release.
    Resolve {
        /// Release and values inputs.
        #[command(flatten)]
        inputs: ValuesArgs,

        /// Only show the intents of one chart template.
        #[arg(short = 's', long = "show-only")]
        template: Option<String>,
    },

    /// Validate the values of a release.
    Validate {
        /// Release and values inputs.
        #[command(flatten)]
        inputs: ValuesArgs,

        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Check the chart version against a deployed release.
    Chart {
        /// Chart directory containing `Chart.yaml`.
        #[arg(long, default_value = ".")]
        chart_dir: PathBuf,

        /// File holding `helm ls --output json` output.
        #[arg(long)]
        helm_ls: Option<PathBuf>,

        /// Release to look up in the listing.
        #[arg(short, long, env = "AUTO_DEPLOY_RELEASE")]
        release: Option<String>,
    },
}

/// Release identity and values sources shared by commands.
#[derive(Args, Debug, Clone)]
pub struct ValuesArgs {
    /// Release name.
    #[arg(short, long, env = "AUTO_DEPLOY_RELEASE")]
    pub release: String,

    /// Target namespace.
    #[arg(short, long, env = "AUTO_DEPLOY_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Directory whose `values.yaml` is loaded before any `-f` file.
    #[arg(long)]
    pub values_dir: Option<PathBuf>,

    /// Values files, merged in order.
    #[arg(short = 'f', long = "values")]
    pub values: Vec<PathBuf>,

    /// Values set on the command line (`key=value[,key=value]`).
    #[arg(long)]
    pub set: Vec<String>,

    /// Values set on the command line, always as strings.
    #[arg(long)]
    pub set_string: Vec<String>,
}

impl ValuesArgs {
    /// Returns the release identity.
    #[must_use]
    pub fn release(&self) -> Release {
        Release::new(&self.release).with_namespace(&self.namespace)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
    /// YAML output for scripting.
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "auto-deploy",
            "resolve",
            "--release",
            "production",
            "--set",
            "workers.worker1.command[0]=echo",
            "--set-string",
            "image.tag=1.0",
            "-f",
            "values.yaml",
            "--show-only",
            "templates/deployment.yaml",
        ])
        .unwrap();

        let Commands::Resolve { inputs, template } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(inputs.release().name, "production");
        assert_eq!(inputs.release().namespace, "default");
        assert_eq!(inputs.set, vec!["workers.worker1.command[0]=echo"]);
        assert_eq!(inputs.set_string, vec!["image.tag=1.0"]);
        assert_eq!(inputs.values, vec![PathBuf::from("values.yaml")]);
        assert_eq!(template.as_deref(), Some("templates/deployment.yaml"));
    }

    #[test]
    fn test_parse_output_format() {
        let cli = Cli::try_parse_from([
            "auto-deploy",
            "--output",
            "yaml",
            "validate",
            "--release",
            "staging",
            "--namespace",
            "review",
        ])
        .unwrap();

        assert!(matches!(cli.output, OutputFormat::Yaml));
        let Commands::Validate { inputs, warnings } = cli.command else {
            panic!("expected validate");
        };
        assert!(!warnings);
        assert_eq!(inputs.release().namespace, "review");
    }
}
