//! Auto-deploy CLI entrypoint.
//!
//! This is the main entrypoint for the auto-deploy command-line tool.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use auto_deploy_resolver::chart::ChartVersion;
use auto_deploy_resolver::cli::{Cli, Commands, OutputFormatter, ValuesArgs};
use auto_deploy_resolver::config::{
    ChartValues, ConfigValidator, ValuesParser, find_values_file,
};
use auto_deploy_resolver::error::{AutoDeployError, Result};
use auto_deploy_resolver::resolver::ManifestResolver;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Dispatches a command.
fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    ValuesParser::new().load_dotenv()?;

    match cli.command {
        Commands::Resolve { inputs, template } => {
            cmd_resolve(&inputs, template.as_deref(), &formatter)
        }
        Commands::Validate { inputs, warnings } => cmd_validate(&inputs, warnings, &formatter),
        Commands::Chart {
            chart_dir,
            helm_ls,
            release,
        } => cmd_chart(&chart_dir, helm_ls.as_deref(), release.as_deref(), &formatter),
    }
}

/// Resolve manifest intents.
fn cmd_resolve(
    inputs: &ValuesArgs,
    template: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let values = load_values(inputs)?;
    let release = inputs.release();

    let validator = ConfigValidator::new();
    validator.validate(&values)?;

    let set = ManifestResolver::new().resolve(&values, &release)?;

    let output = match template {
        Some(path) => formatter.format_intents(&set.template(path)?),
        None => formatter.format_manifests(&set),
    };
    print_output(&output)
}

/// Validate values.
fn cmd_validate(inputs: &ValuesArgs, show_warnings: bool, formatter: &OutputFormatter) -> Result<()> {
    let values = load_values(inputs)?;
    let release = inputs.release();

    ManifestResolver::new().resolve(&values, &release)?;

    let validator = ConfigValidator::new();
    let result = validator.validate(&values)?;

    print_output(&formatter.format_validation(&result, show_warnings))
}

/// Check the chart version against a deployed release.
fn cmd_chart(
    chart_dir: &Path,
    helm_ls: Option<&Path>,
    release: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let current = ChartVersion::load_from_chart_yaml(chart_dir)?.ok_or_else(|| {
        AutoDeployError::internal(format!(
            "{} does not hold the auto-deploy-app chart",
            chart_dir.display()
        ))
    })?;

    let previous = match (helm_ls, release) {
        (Some(path), Some(release)) => {
            let listing = std::fs::read_to_string(path)?;
            ChartVersion::load_from_helm_ls(&listing, release)?
        }
        (Some(_), None) => {
            warn!("--helm-ls given without --release; treating as a first install");
            None
        }
        (None, _) => None,
    };

    let check = current.check_upgrade(previous, |name| std::env::var(name).ok());
    print_output(&formatter.format_upgrade(&check))?;

    if check.allowed() {
        Ok(())
    } else {
        Err(AutoDeployError::internal(format!(
            "Detected an incompatible chart upgrade from {} to {current}",
            previous.map_or_else(String::new, |p| p.to_string())
        )))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads chart values from the default values file, `-f` files and `--set`
/// expressions.
fn load_values(inputs: &ValuesArgs) -> Result<ChartValues> {
    let mut files = Vec::new();
    if let Some(dir) = &inputs.values_dir {
        files.push(find_values_file(dir)?);
    }
    files.extend(inputs.values.iter().cloned());

    debug!(
        "Loading values from {} file(s) and {} expression(s)",
        files.len(),
        inputs.set.len() + inputs.set_string.len()
    );

    let values = ValuesParser::new().load_values(&files, &inputs.set, &inputs.set_string)?;
    info!("Loaded values for release {}", inputs.release);
    Ok(values)
}

/// Writes command output to stdout.
fn print_output(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}
