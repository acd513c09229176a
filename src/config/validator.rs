//! Validation for chart values and release identity.
//!
//! Release-name validation is fatal and runs before any resolution.
//! Configuration validation collects errors and non-fatal warnings about
//! values that resolve but are probably not what the operator meant.

use crate::error::{AutoDeployError, ConfigError, MAX_RELEASE_NAME_LEN, ResolveError, Result};
use tracing::{debug, warn};

use super::spec::{ChartValues, ProbeOverride, ProbeType, Release};

/// Largest meaningful canary weight.
const MAX_CANARY_WEIGHT: u32 = 100;

/// Validator for release identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReleaseValidator;

/// Validator for chart values.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ReleaseValidator {
    /// Creates a new release validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a release identity.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ReleaseNameTooLong`] when the name exceeds
    /// 53 bytes.
    pub fn validate_release(&self, release: &Release) -> std::result::Result<(), ResolveError> {
        if release.name.len() > MAX_RELEASE_NAME_LEN {
            return Err(ResolveError::release_name_too_long(&release.name));
        }
        Ok(())
    }
}

impl ConfigValidator {
    /// Creates a new configuration validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates chart values.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any were found. Warnings never
    /// fail validation.
    pub fn validate(&self, values: &ChartValues) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_image(values, &mut result);
        Self::validate_service(values, &mut result);
        Self::validate_ingress(values, &mut result);
        Self::validate_hpa(values, &mut result);
        Self::validate_probes("livenessProbe", &values.liveness_probe, &mut result);
        Self::validate_probes("readinessProbe", &values.readiness_probe, &mut result);
        Self::validate_workers(values, &mut result);

        for warning in &result.warnings {
            warn!("{warning}");
        }

        if result.errors.is_empty() {
            debug!("Values validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(AutoDeployError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )))
        }
    }

    fn validate_image(values: &ChartValues, result: &mut ValidationResult) {
        if values.image.repository.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("image.repository"),
                message: String::from("Image repository cannot be empty"),
            });
        }
    }

    fn validate_service(values: &ChartValues, result: &mut ValidationResult) {
        let ports = [
            ("service.externalPort", values.service.external_port),
            ("service.internalPort", values.service.internal_port),
        ];

        for (field, port) in ports {
            if port == 0 || port > u32::from(u16::MAX) {
                result.errors.push(ValidationError {
                    field: String::from(field),
                    message: format!("Port {port} is out of range (1-65535)"),
                });
            }
        }
    }

    fn validate_ingress(values: &ChartValues, result: &mut ValidationResult) {
        let ingress = &values.ingress;

        if let (Some(scoped), Some(legacy)) =
            (ingress.tls.use_default_secret, ingress.use_default_secret)
        {
            if scoped != legacy {
                result.warnings.push(format!(
                    "ingress.useDefaultSecret: conflicts with ingress.tls.useDefaultSecret; using {scoped}"
                ));
            }
        }

        if let Some(weight) = ingress.canary.weight {
            if weight > MAX_CANARY_WEIGHT {
                result.warnings.push(format!(
                    "ingress.canary.weight: {weight} exceeds {MAX_CANARY_WEIGHT}"
                ));
            }
        }

        if ingress.enabled == Some(true) && !values.service.enabled {
            result.warnings.push(String::from(
                "ingress.enabled: ignored because service.enabled is false",
            ));
        }

        if !ingress.path.starts_with('/') {
            result.errors.push(ValidationError {
                field: String::from("ingress.path"),
                message: format!("Ingress path must be absolute: {}", ingress.path),
            });
        }
    }

    fn validate_hpa(values: &ChartValues, result: &mut ValidationResult) {
        let hpa = &values.hpa;

        if hpa.min_replicas > hpa.max_replicas {
            result.warnings.push(format!(
                "hpa.minReplicas: {} is greater than hpa.maxReplicas {}",
                hpa.min_replicas, hpa.max_replicas
            ));
        }

        if hpa.enabled && !values.has_cpu_request() {
            result.warnings.push(String::from(
                "hpa.enabled: no autoscaler without resources.requests.cpu",
            ));
        }
    }

    fn validate_probes(prefix: &str, probe: &ProbeOverride, result: &mut ValidationResult) {
        if probe.probe_type == Some(ProbeType::Exec) && probe.command.is_empty() {
            result.warnings.push(format!(
                "{prefix}.probeType: exec probe has no command"
            ));
        }
    }

    fn validate_workers(values: &ChartValues, result: &mut ValidationResult) {
        for (name, worker) in &values.workers {
            let prefix = format!("workers.{name}");

            if !is_valid_name(name) {
                result.warnings.push(format!(
                    "{prefix}: worker key '{name}' is not a valid DNS label"
                ));
            }

            if worker.command.is_empty() {
                result.warnings.push(format!("{prefix}.command: worker has no command"));
            }

            Self::validate_probes(
                &format!("{prefix}.livenessProbe"),
                &worker.liveness_probe,
                result,
            );
            Self::validate_probes(
                &format!("{prefix}.readinessProbe"),
                &worker.readiness_probe,
                result,
            );
        }
    }
}

/// Validates that a name is a DNS label.
/// Names must be lowercase alphanumeric with hyphens, starting with a letter.
fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 63 {
        return false;
    }

    let mut chars = name.chars();

    // First character must be a letter
    if !chars.next().is_some_and(|first| first.is_ascii_lowercase()) {
        return false;
    }

    // Rest must be lowercase alphanumeric or hyphen
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return false;
    }

    // Cannot end with hyphen
    !name.ends_with('-')
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
