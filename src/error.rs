//! Error types for the auto-deploy manifest resolver.
//!
//! This module provides the error hierarchy for every stage of a resolution:
//! loading values, coercing them into the typed configuration tree, resolving
//! manifest intents, and inspecting the managed chart version.

use std::path::PathBuf;
use thiserror::Error;

/// Maximum length of a Helm release name, in bytes.
pub const MAX_RELEASE_NAME_LEN: usize = 53;

/// The main error type for the resolver.
#[derive(Debug, Error)]
pub enum AutoDeployError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resolution errors. Displayed verbatim so callers can pattern-match
    /// on the message shape.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Chart version errors.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The values file was not found.
    #[error("Values file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The values could not be parsed or coerced into their declared types.
    #[error("Failed to parse values: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A `--set` expression is malformed.
    #[error("Invalid set expression '{expression}': {reason}")]
    InvalidSetExpression {
        /// The offending expression.
        expression: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },
}

/// Errors produced while resolving manifest intents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The release name cannot be used as a Kubernetes object name prefix.
    #[error("release name {name:?} exceeds max length of {max}")]
    ReleaseNameTooLong {
        /// The rejected release name.
        name: String,
        /// The maximum allowed length.
        max: usize,
    },

    /// A template was requested that the configuration does not produce.
    #[error("could not find template {template} in chart")]
    TemplateNotProduced {
        /// Chart-relative template path.
        template: String,
    },
}

/// Chart version errors.
#[derive(Debug, Error)]
pub enum ChartError {
    /// `Chart.yaml` or `helm ls` output could not be parsed.
    #[error("Failed to parse chart metadata: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, AutoDeployError>;

impl AutoDeployError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is retryable.
    ///
    /// Resolution is a pure function of its input, so nothing is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a parse error without a source location.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Creates a set-expression error.
    #[must_use]
    pub fn invalid_set(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSetExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

impl ResolveError {
    /// Creates a release-name-too-long error for the given name.
    #[must_use]
    pub fn release_name_too_long(name: impl Into<String>) -> Self {
        Self::ReleaseNameTooLong {
            name: name.into(),
            max: MAX_RELEASE_NAME_LEN,
        }
    }

    /// Creates a template-not-produced error.
    #[must_use]
    pub fn template_not_produced(template: impl Into<String>) -> Self {
        Self::TemplateNotProduced {
            template: template.into(),
        }
    }
}

impl ChartError {
    /// Creates a parse error with an optional location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_name_message_shape() {
        let err = ResolveError::release_name_too_long("r".repeat(60));
        let message = err.to_string();
        assert!(message.starts_with("release name \"rrr"));
        assert!(message.ends_with("exceeds max length of 53"));
    }

    #[test]
    fn test_resolve_error_is_transparent() {
        let err: AutoDeployError =
            ResolveError::template_not_produced("templates/ingress.yaml").into();
        assert_eq!(
            err.to_string(),
            "could not find template templates/ingress.yaml in chart"
        );
        assert!(!err.is_retryable());
    }
}
