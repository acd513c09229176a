//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::chart::UpgradeCheck;
use crate::config::{ConfigHasher, ValidationResult};
use crate::resolver::{ManifestIntent, ResolvedManifestSet, TemplateKind};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Intent row for table display.
#[derive(Tabled)]
struct IntentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Template")]
    template: String,
    #[tabled(rename = "Labels")]
    labels: usize,
    #[tabled(rename = "Annotations")]
    annotations: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a resolved manifest set for display.
    #[must_use]
    pub fn format_manifests(&self, set: &ResolvedManifestSet) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(set).unwrap_or_default(),
            OutputFormat::Yaml => serde_yaml::to_string(set).unwrap_or_default(),
            OutputFormat::Text => Self::format_manifests_text(set),
        }
    }

    /// Formats the intents of a single template.
    #[must_use]
    pub fn format_intents(&self, intents: &[ManifestIntent<'_>]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(intents).unwrap_or_default(),
            OutputFormat::Yaml => serde_yaml::to_string(intents).unwrap_or_default(),
            OutputFormat::Text => Self::intents_table(intents),
        }
    }

    /// Formats a manifest set as text.
    fn format_manifests_text(set: &ResolvedManifestSet) -> String {
        let mut output = String::new();

        let _ = write!(
            output,
            "\n📦 Release: {}/{} (chart {})\n\n",
            set.release.namespace, set.release.name, set.chart
        );

        let intents = set.intents();
        output.push_str(&Self::intents_table(&intents));

        let deployment = &set.deployment;
        let _ = write!(
            output,
            "\nImage: {}\nTrack: {}\n",
            deployment.container.image, deployment.track
        );

        if let Some(ingress) = &set.ingress {
            let tls = if ingress.tls.is_enabled() {
                "tls".green().to_string()
            } else {
                "no tls".yellow().to_string()
            };
            let _ = writeln!(
                output,
                "Hosts: {} ({tls})",
                ingress.hosts.join(", ")
            );
        }

        if let Some(hpa) = &set.hpa {
            let _ = writeln!(
                output,
                "Autoscaling: {}..{} replicas at {}% CPU",
                hpa.min_replicas, hpa.max_replicas, hpa.target_cpu_utilization_percentage
            );
        }

        if let Ok(fingerprint) = set.fingerprint() {
            let _ = writeln!(
                output,
                "Fingerprint: {}",
                ConfigHasher::new().short_hash(&fingerprint)
            );
        }

        let _ = write!(
            output,
            "\n{} {} manifest intent(s) resolved\n",
            "✓".green(),
            intents.len()
        );

        output
    }

    /// Renders intents as a table.
    fn intents_table(intents: &[ManifestIntent<'_>]) -> String {
        let rows: Vec<IntentRow> = intents
            .iter()
            .enumerate()
            .map(|(i, intent)| IntentRow {
                index: i + 1,
                kind: intent.kind().to_string(),
                name: intent.name().to_string(),
                template: TemplateKind::of(intent).to_string(),
                labels: intent.metadata().labels.len(),
                annotations: intent.metadata().annotations.len(),
            })
            .collect();

        let mut output = Table::new(rows).to_string();
        output.push('\n');
        output
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&ValidationJson::new(result, show_warnings))
                    .unwrap_or_default()
            }
            OutputFormat::Yaml => serde_yaml::to_string(&ValidationJson::new(result, show_warnings))
                .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Values are valid\n", "✓".green())
                } else {
                    let mut output =
                        format!("{} {} validation error(s):\n", "✗".red(), result.error_count());
                    for error in &result.errors {
                        let _ = writeln!(output, "   - {error}");
                    }
                    output
                };

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats a chart upgrade check.
    #[must_use]
    pub fn format_upgrade(&self, check: &UpgradeCheck) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(check).unwrap_or_default(),
            OutputFormat::Yaml => serde_yaml::to_string(check).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();
                let _ = writeln!(output, "   Chart: {}", check.current);
                let _ = writeln!(
                    output,
                    "   Deployed: {}",
                    check
                        .previous
                        .map_or_else(|| "none".dimmed().to_string(), |p| p.to_string())
                );

                let status = if check.compatible {
                    format!("{} Upgrade is compatible", "✓".green())
                } else if check.forced {
                    format!("{} Incompatible upgrade forced", "⚠".yellow())
                } else {
                    format!(
                        "{} Incompatible upgrade; set {} to force it",
                        "✗".red(),
                        check.current.force_deploy_variable()
                    )
                };
                let _ = writeln!(output, "\n{status}");
                output
            }
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct ValidationJson {
    valid: bool,
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl ValidationJson {
    fn new(result: &ValidationResult, show_warnings: bool) -> Self {
        Self {
            valid: result.is_valid(),
            errors: result.errors.iter().map(ToString::to_string).collect(),
            warnings: if show_warnings {
                result.warnings.clone()
            } else {
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartVersion;
    use crate::config::{ChartValues, Release};
    use crate::resolver::ManifestResolver;

    fn resolved() -> ResolvedManifestSet {
        ManifestResolver::new()
            .resolve(&ChartValues::default(), &Release::new("production"))
            .unwrap()
    }

    #[test]
    fn test_json_manifests() {
        let output = OutputFormatter::new(OutputFormat::Json).format_manifests(&resolved());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["deployment"]["metadata"]["name"], "production");
        assert_eq!(parsed["service"]["metadata"]["name"], "production-auto-deploy");
    }

    #[test]
    fn test_yaml_intents_are_tagged() {
        let set = resolved();
        let intents = set.template("templates/service.yaml").unwrap();
        let output = OutputFormatter::new(OutputFormat::Yaml).format_intents(&intents);
        assert!(output.contains("kind: Service"));
    }

    #[test]
    fn test_text_manifests() {
        let output = OutputFormatter::new(OutputFormat::Text).format_manifests(&resolved());
        assert!(output.contains("production-auto-deploy"));
        assert!(output.contains("templates/ingress.yaml"));
        assert!(output.contains("my.host.com"));
        assert!(output.contains("Fingerprint: "));
    }

    #[test]
    fn test_validation_json() {
        let result = ValidationResult {
            errors: Vec::new(),
            warnings: vec![String::from("hpa.enabled without resources.requests.cpu")],
        };
        let formatter = OutputFormatter::new(OutputFormat::Json);

        let parsed: serde_json::Value =
            serde_json::from_str(&formatter.format_validation(&result, true)).unwrap();
        assert_eq!(parsed["valid"], true);
        assert_eq!(parsed["warnings"].as_array().map(Vec::len), Some(1));

        let parsed: serde_json::Value =
            serde_json::from_str(&formatter.format_validation(&result, false)).unwrap();
        assert!(parsed.get("warnings").is_none());
    }

    #[test]
    fn test_upgrade_text_names_force_variable() {
        let check = ChartVersion::new(2, 3, 0)
            .check_upgrade(Some(ChartVersion::new(1, 0, 0)), |_: &str| None);
        let output = OutputFormatter::new(OutputFormat::Text).format_upgrade(&check);
        assert!(output.contains("AUTO_DEVOPS_FORCE_DEPLOY_V2"));
    }
}
