//! Chart template lookup.
//!
//! Maps chart template paths to the intents they produce, so callers can ask
//! for one template the way `helm template --show-only` does.

use serde::Serialize;
use std::fmt;

use crate::error::ResolveError;

use super::intents::{JobKind, ManifestIntent, ResolvedManifestSet};

/// A template of the `auto-deploy-app` chart.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `templates/deployment.yaml`
    Deployment,
    /// `templates/worker-deployment.yaml`
    WorkerDeployment,
    /// `templates/service.yaml`
    Service,
    /// `templates/ingress.yaml`
    Ingress,
    /// `templates/hpa.yaml`
    Hpa,
    /// `templates/db-initialize-job.yaml`
    DbInitializeJob,
    /// `templates/db-migrate-hook.yaml`
    DbMigrateHook,
}

impl TemplateKind {
    /// Every template, in emission order.
    pub const ALL: [Self; 7] = [
        Self::Deployment,
        Self::WorkerDeployment,
        Self::Service,
        Self::Ingress,
        Self::Hpa,
        Self::DbInitializeJob,
        Self::DbMigrateHook,
    ];

    /// Returns the chart-relative template path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Deployment => "templates/deployment.yaml",
            Self::WorkerDeployment => "templates/worker-deployment.yaml",
            Self::Service => "templates/service.yaml",
            Self::Ingress => "templates/ingress.yaml",
            Self::Hpa => "templates/hpa.yaml",
            Self::DbInitializeJob => "templates/db-initialize-job.yaml",
            Self::DbMigrateHook => "templates/db-migrate-hook.yaml",
        }
    }

    /// Looks a template up by path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    /// Returns the template an intent comes from.
    #[must_use]
    pub fn of(intent: &ManifestIntent<'_>) -> Self {
        match intent {
            ManifestIntent::Deployment(w) if w.is_worker() => Self::WorkerDeployment,
            ManifestIntent::Deployment(_) => Self::Deployment,
            ManifestIntent::Service(_) => Self::Service,
            ManifestIntent::Ingress(_) => Self::Ingress,
            ManifestIntent::Hpa(_) => Self::Hpa,
            ManifestIntent::Job(j) => match j.job {
                JobKind::Initialize => Self::DbInitializeJob,
                JobKind::Migrate => Self::DbMigrateHook,
            },
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl ResolvedManifestSet {
    /// Returns the intents produced by one chart template.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::TemplateNotProduced`] when the template is
    /// unknown or produced nothing for this configuration.
    pub fn template(&self, path: &str) -> Result<Vec<ManifestIntent<'_>>, ResolveError> {
        let kind =
            TemplateKind::from_path(path).ok_or_else(|| ResolveError::template_not_produced(path))?;

        let intents: Vec<_> = self
            .intents()
            .into_iter()
            .filter(|intent| TemplateKind::of(intent) == kind)
            .collect();

        if intents.is_empty() {
            return Err(ResolveError::template_not_produced(path));
        }
        Ok(intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::from_path(kind.path()), Some(kind));
        }
        assert_eq!(TemplateKind::from_path("templates/pdb.yaml"), None);
    }
}
