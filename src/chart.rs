//! Identity of the GitLab-managed `auto-deploy-app` chart.
//!
//! A deployed release records its chart as `auto-deploy-app-X.Y.Z`. This
//! module reads that identity from `helm ls --output json` or from a chart's
//! `Chart.yaml`, and decides whether an upgrade between two chart versions
//! is compatible or may be forced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ChartError, Result};

/// Name of the chart managed by GitLab.
pub const GITLAB_MANAGED_CHART_NAME: &str = "auto-deploy-app";

/// Prefix of the environment variables that allow a forced deploy.
pub const FORCE_DEPLOY_ENV_PREFIX: &str = "AUTO_DEVOPS_FORCE_DEPLOY_V";

/// Version of the managed chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChartVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

#[derive(Debug, Deserialize)]
struct HelmListing {
    #[serde(rename = "Releases", default)]
    releases: Vec<HelmRelease>,
}

#[derive(Debug, Deserialize)]
struct HelmRelease {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Chart", default)]
    chart: String,
}

#[derive(Debug, Deserialize)]
struct ChartMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

impl Default for ChartVersion {
    fn default() -> Self {
        Self::new(2, 3, 0)
    }
}

impl ChartVersion {
    /// Creates a chart version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parses a chart reference such as `auto-deploy-app-1.2.3`.
    ///
    /// Returns `None` for charts not managed by GitLab.
    #[must_use]
    pub fn parse_chart_ref(chart: &str) -> Option<Self> {
        chart
            .match_indices('-')
            .rev()
            .find_map(|(i, _)| Some((&chart[..i], parse_version(&chart[i + 1..])?)))
            .filter(|(name, _)| *name == GITLAB_MANAGED_CHART_NAME)
            .map(|(_, version)| version)
    }

    /// Loads the chart version of a release from `helm ls --output json`.
    ///
    /// Empty output, an unknown release and a foreign chart all yield
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is not valid JSON.
    pub fn load_from_helm_ls(data: &str, release_name: &str) -> Result<Option<Self>> {
        if data.trim().is_empty() {
            debug!("helm ls output is empty");
            return Ok(None);
        }

        let listing: HelmListing = serde_json::from_str(data)
            .map_err(|e| ChartError::parse(format!("Invalid helm ls output: {e}"), None))?;

        let Some(release) = listing.releases.iter().find(|r| r.name == release_name) else {
            debug!("Release {release_name} not found in helm ls output");
            return Ok(None);
        };

        let version = Self::parse_chart_ref(&release.chart);
        if version.is_none() {
            debug!("Release {release_name} uses chart {}", release.chart);
        }
        Ok(version)
    }

    /// Loads the chart version from `<chart_dir>/Chart.yaml`.
    ///
    /// Returns `None` for charts not managed by GitLab.
    ///
    /// # Errors
    ///
    /// Returns an error if `Chart.yaml` cannot be read or parsed.
    pub fn load_from_chart_yaml(chart_dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = chart_dir.as_ref().join("Chart.yaml");
        info!("Loading chart metadata from: {}", path.display());

        let content = std::fs::read_to_string(&path)?;
        let metadata: ChartMetadata = serde_yaml::from_str(&content).map_err(|e| {
            ChartError::parse(
                format!("Invalid Chart.yaml: {e}"),
                Some(path.display().to_string()),
            )
        })?;

        if metadata.name != GITLAB_MANAGED_CHART_NAME {
            return Ok(None);
        }
        Ok(parse_version(&metadata.version))
    }

    /// Returns true when an upgrade from `previous` needs no forced deploy.
    ///
    /// v0 charts upgrade to v1; otherwise majors must match.
    #[must_use]
    pub const fn compatible(&self, previous: &Self) -> bool {
        if self.major == 1 && previous.major == 0 {
            return true;
        }
        self.major == previous.major
    }

    /// Name of the variable that allows forcing a deploy of this major.
    #[must_use]
    pub fn force_deploy_variable(&self) -> String {
        format!("{FORCE_DEPLOY_ENV_PREFIX}{}", self.major)
    }

    /// Returns true when the force-deploy variable for this major is set.
    #[must_use]
    pub fn allowed_to_force_deploy<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.force_deploy_variable()).is_some()
    }

    /// Returns the chart label value, `auto-deploy-app-X.Y.Z`.
    #[must_use]
    pub fn chart_label(&self) -> String {
        format!(
            "{GITLAB_MANAGED_CHART_NAME}-{}.{}.{}",
            self.major, self.minor, self.patch
        )
    }
}

/// Outcome of comparing the chart about to be deployed with the deployed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpgradeCheck {
    /// Chart about to be deployed.
    pub current: ChartVersion,
    /// Chart of the deployed release, if any.
    pub previous: Option<ChartVersion>,
    /// Whether the upgrade needs no forced deploy.
    pub compatible: bool,
    /// Whether the force-deploy variable is set for an incompatible upgrade.
    pub forced: bool,
}

impl UpgradeCheck {
    /// Returns true when the deploy may proceed.
    #[must_use]
    pub const fn allowed(&self) -> bool {
        self.compatible || self.forced
    }
}

impl ChartVersion {
    /// Checks an upgrade from the deployed chart `previous` to this one.
    ///
    /// A first install is always compatible.
    #[must_use]
    pub fn check_upgrade<F>(&self, previous: Option<Self>, lookup: F) -> UpgradeCheck
    where
        F: Fn(&str) -> Option<String>,
    {
        let compatible = previous.is_none_or(|previous| self.compatible(&previous));
        let forced = !compatible && self.allowed_to_force_deploy(lookup);

        if !compatible {
            debug!(
                "Chart {self} is incompatible with deployed chart {}",
                previous.map_or_else(String::new, |p| p.to_string())
            );
        }

        UpgradeCheck {
            current: *self,
            previous,
            compatible,
            forced,
        }
    }
}

impl fmt::Display for ChartVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parses `X.Y.Z`, ignoring anything after the patch digits.
fn parse_version(version: &str) -> Option<ChartVersion> {
    let mut parts = version.trim().splitn(3, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;

    let rest = parts.next()?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let patch = digits.parse().ok()?;

    Some(ChartVersion::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoDeployError;

    const HELM_LS: &str = r#"{
      "Next": "",
      "Releases": [
        {"Name": "production", "Revision": 1, "Status": "DEPLOYED", "Chart": "auto-deploy-app-1.2.3"},
        {"Name": "production-canary", "Revision": 2, "Status": "DEPLOYED", "Chart": "auto-deploy-app-4.5.6"},
        {"Name": "production-postgresql", "Revision": 9, "Status": "DEPLOYED", "Chart": "postgresql-8.2.1"}
      ]
    }"#;

    #[test]
    fn test_parse_chart_ref() {
        assert_eq!(
            ChartVersion::parse_chart_ref("auto-deploy-app-1.2.3"),
            Some(ChartVersion::new(1, 2, 3))
        );
        assert_eq!(ChartVersion::parse_chart_ref("postgresql-8.2.1"), None);
        assert_eq!(ChartVersion::parse_chart_ref("auto-deploy-app"), None);
    }

    #[test]
    fn test_load_from_helm_ls() {
        let stable = ChartVersion::load_from_helm_ls(HELM_LS, "production").unwrap();
        assert_eq!(stable, Some(ChartVersion::new(1, 2, 3)));

        let canary = ChartVersion::load_from_helm_ls(HELM_LS, "production-canary").unwrap();
        assert_eq!(canary, Some(ChartVersion::new(4, 5, 6)));
    }

    #[test]
    fn test_load_from_helm_ls_none() {
        assert_eq!(ChartVersion::load_from_helm_ls(HELM_LS, "production-unknown").unwrap(), None);
        assert_eq!(
            ChartVersion::load_from_helm_ls(HELM_LS, "production-postgresql").unwrap(),
            None
        );
        assert_eq!(ChartVersion::load_from_helm_ls("", "production").unwrap(), None);
    }

    #[test]
    fn test_load_from_helm_ls_invalid_json() {
        let result = ChartVersion::load_from_helm_ls("test", "production");
        assert!(matches!(result, Err(AutoDeployError::Chart(_))));
    }

    #[test]
    fn test_load_from_chart_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Chart.yaml"),
            "apiVersion: v1\ndescription: GitLab's Auto-deploy Helm Chart\nname: auto-deploy-app\nversion: 1.0.3\n",
        )
        .unwrap();

        let chart = ChartVersion::load_from_chart_yaml(dir.path()).unwrap();
        assert_eq!(chart, Some(ChartVersion::new(1, 0, 3)));
    }

    #[test]
    fn test_load_from_chart_yaml_foreign_chart() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Chart.yaml"),
            "apiVersion: v1\nname: custom-chart\nversion: 1.0.3\n",
        )
        .unwrap();

        assert_eq!(ChartVersion::load_from_chart_yaml(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_load_from_chart_yaml_missing() {
        let result = ChartVersion::load_from_chart_yaml("/nonexistent/chart");
        assert!(matches!(result, Err(AutoDeployError::Io(_))));
    }

    #[test]
    fn test_compatible() {
        let v0 = ChartVersion::new(0, 17, 0);
        let v1 = ChartVersion::new(1, 0, 0);
        let v2 = ChartVersion::new(2, 3, 0);

        assert!(v1.compatible(&v0));
        assert!(v1.compatible(&ChartVersion::new(1, 2, 3)));
        assert!(!v2.compatible(&v1));
        assert!(!v0.compatible(&v1));
    }

    #[test]
    fn test_allowed_to_force_deploy() {
        let chart = ChartVersion::new(2, 0, 0);
        assert_eq!(chart.force_deploy_variable(), "AUTO_DEVOPS_FORCE_DEPLOY_V2");

        let set = |name: &str| (name == "AUTO_DEVOPS_FORCE_DEPLOY_V2").then(|| String::from("true"));
        assert!(chart.allowed_to_force_deploy(set));
        assert!(!chart.allowed_to_force_deploy(|_: &str| None));
    }

    #[test]
    fn test_check_upgrade() {
        let v1 = ChartVersion::new(1, 2, 3);
        let v2 = ChartVersion::new(2, 3, 0);

        let first = v2.check_upgrade(None, |_: &str| None);
        assert!(first.compatible);
        assert!(first.allowed());

        let blocked = v2.check_upgrade(Some(v1), |_: &str| None);
        assert!(!blocked.compatible);
        assert!(!blocked.forced);
        assert!(!blocked.allowed());

        let forced = v2.check_upgrade(Some(v1), |_: &str| Some(String::from("true")));
        assert!(forced.forced);
        assert!(forced.allowed());

        let same = v2.check_upgrade(Some(ChartVersion::new(2, 0, 1)), |_: &str| None);
        assert!(same.compatible);
        assert!(!same.forced);
    }

    #[test]
    fn test_display_and_label() {
        let chart = ChartVersion::default();
        assert_eq!(chart.to_string(), "v2.3.0");
        assert_eq!(chart.chart_label(), "auto-deploy-app-2.3.0");
    }
}
