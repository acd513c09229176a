//! Label and selector composition.
//!
//! Two label schemes coexist. The legacy scheme (`app`, `chart`, `release`,
//! `heritage`) is always present; the recommended `app.kubernetes.io/*`
//! scheme is added under [`LabelProfile::Recommended`] to the shared labels
//! of the service, ingress, autoscaler and jobs. Workload deployments carry
//! legacy keys only. Selectors only ever use legacy keys whose values are
//! fixed for the lifetime of a release.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ChartValues;

use super::intents::Tier;

/// Legacy application label.
pub const LABEL_APP: &str = "app";
/// Legacy chart label.
pub const LABEL_CHART: &str = "chart";
/// Legacy release label.
pub const LABEL_RELEASE: &str = "release";
/// Legacy heritage label.
pub const LABEL_HERITAGE: &str = "heritage";
/// Workload tier label.
pub const LABEL_TIER: &str = "tier";
/// Deployment track label.
pub const LABEL_TRACK: &str = "track";
/// Recommended name label.
pub const LABEL_NAME: &str = "app.kubernetes.io/name";
/// Recommended chart label.
pub const LABEL_HELM_CHART: &str = "helm.sh/chart";
/// Recommended instance label.
pub const LABEL_INSTANCE: &str = "app.kubernetes.io/instance";
/// Recommended managed-by label.
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Value of the heritage and managed-by labels.
pub const HERITAGE: &str = "Helm";

/// Keys owned by the chart; extra labels never override them.
pub const RESERVED_LABELS: &[&str] = &[
    LABEL_APP,
    LABEL_CHART,
    LABEL_RELEASE,
    LABEL_HERITAGE,
    LABEL_TIER,
    LABEL_TRACK,
    LABEL_NAME,
    LABEL_HELM_CHART,
    LABEL_INSTANCE,
    LABEL_MANAGED_BY,
];

/// Label scheme selection.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabelProfile {
    /// Legacy labels only.
    Legacy,
    /// Legacy plus recommended labels.
    #[default]
    Recommended,
}

impl LabelProfile {
    /// Selects the profile from `labels.useRecommended`.
    #[must_use]
    pub const fn from_values(values: &ChartValues) -> Self {
        if values.labels.use_recommended {
            Self::Recommended
        } else {
            Self::Legacy
        }
    }
}

/// Label inputs shared by every manifest of a release.
#[derive(Debug, Clone)]
pub struct LabelSet<'a> {
    profile: LabelProfile,
    app: &'a str,
    release: &'a str,
    chart: &'a str,
    track: &'a str,
    extra: &'a BTreeMap<String, String>,
}

impl<'a> LabelSet<'a> {
    /// Creates the label inputs for a release.
    #[must_use]
    pub const fn new(
        profile: LabelProfile,
        app: &'a str,
        release: &'a str,
        chart: &'a str,
        track: &'a str,
        extra: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            profile,
            app,
            release,
            chart,
            track,
            extra,
        }
    }

    /// Labels of ingress, autoscaler and database jobs.
    #[must_use]
    pub fn base(&self) -> BTreeMap<String, String> {
        let mut labels = self.chart_labels();
        labels.insert(LABEL_APP.to_string(), self.app.to_string());
        self.with_extra(labels)
    }

    /// Labels of the main deployment. Legacy keys whatever the profile.
    #[must_use]
    pub fn main_deployment(&self) -> BTreeMap<String, String> {
        let mut labels = self.legacy_labels();
        labels.insert(LABEL_APP.to_string(), self.app.to_string());
        labels.insert(LABEL_TIER.to_string(), Tier::Web.to_string());
        labels.insert(LABEL_TRACK.to_string(), self.track.to_string());
        self.with_extra(labels)
    }

    /// Labels of a worker deployment; legacy keys without `app`.
    #[must_use]
    pub fn worker(&self) -> BTreeMap<String, String> {
        let mut labels = self.legacy_labels();
        labels.insert(LABEL_TIER.to_string(), Tier::Worker.to_string());
        labels.insert(LABEL_TRACK.to_string(), self.track.to_string());
        self.with_extra(labels)
    }

    /// Labels of the service.
    #[must_use]
    pub fn service(&self) -> BTreeMap<String, String> {
        let mut labels = self.base();
        labels.insert(LABEL_TRACK.to_string(), self.track.to_string());
        labels
    }

    /// Selector of the main deployment.
    #[must_use]
    pub fn main_selector(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (LABEL_APP.to_string(), self.app.to_string()),
            (LABEL_RELEASE.to_string(), self.release.to_string()),
            (LABEL_TIER.to_string(), Tier::Web.to_string()),
            (LABEL_TRACK.to_string(), self.track.to_string()),
        ])
    }

    /// Selector of a worker deployment.
    #[must_use]
    pub fn worker_selector(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (LABEL_RELEASE.to_string(), self.release.to_string()),
            (LABEL_TIER.to_string(), Tier::Worker.to_string()),
            (LABEL_TRACK.to_string(), self.track.to_string()),
        ])
    }

    /// Selector of the service.
    #[must_use]
    pub fn service_selector(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (LABEL_APP.to_string(), self.app.to_string()),
            (LABEL_TIER.to_string(), Tier::Web.to_string()),
            (LABEL_TRACK.to_string(), self.track.to_string()),
        ])
    }

    /// `chart`, `release`, `heritage` and, under the recommended profile,
    /// the `app.kubernetes.io/*` labels.
    fn chart_labels(&self) -> BTreeMap<String, String> {
        let mut labels = self.legacy_labels();

        if self.profile == LabelProfile::Recommended {
            labels.insert(LABEL_NAME.to_string(), self.app.to_string());
            labels.insert(LABEL_HELM_CHART.to_string(), self.chart.to_string());
            labels.insert(LABEL_INSTANCE.to_string(), self.release.to_string());
            labels.insert(LABEL_MANAGED_BY.to_string(), HERITAGE.to_string());
        }

        labels
    }

    fn legacy_labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (LABEL_CHART.to_string(), self.chart.to_string()),
            (LABEL_RELEASE.to_string(), self.release.to_string()),
            (LABEL_HERITAGE.to_string(), HERITAGE.to_string()),
        ])
    }

    fn with_extra(&self, mut labels: BTreeMap<String, String>) -> BTreeMap<String, String> {
        for (key, value) in self.extra {
            if !is_reserved(key) {
                labels.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        labels
    }
}

/// Returns true for label keys owned by the chart.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    RESERVED_LABELS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_set(profile: LabelProfile, extra: &BTreeMap<String, String>) -> LabelSet<'_> {
        LabelSet::new(
            profile,
            "production",
            "production",
            "auto-deploy-app-2.3.0",
            "stable",
            extra,
        )
    }

    #[test]
    fn test_legacy_main_labels() {
        let extra = BTreeMap::new();
        let labels = label_set(LabelProfile::Legacy, &extra).main_deployment();

        let expected = BTreeMap::from([
            (String::from("app"), String::from("production")),
            (String::from("chart"), String::from("auto-deploy-app-2.3.0")),
            (String::from("heritage"), String::from("Helm")),
            (String::from("release"), String::from("production")),
            (String::from("tier"), String::from("web")),
            (String::from("track"), String::from("stable")),
        ]);
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_recommended_labels_added() {
        let extra = BTreeMap::new();
        let labels = label_set(LabelProfile::Recommended, &extra).base();

        assert_eq!(labels[LABEL_NAME], "production");
        assert_eq!(labels[LABEL_HELM_CHART], "auto-deploy-app-2.3.0");
        assert_eq!(labels[LABEL_INSTANCE], "production");
        assert_eq!(labels[LABEL_MANAGED_BY], "Helm");
        assert_eq!(labels[LABEL_APP], "production");
    }

    #[test]
    fn test_workload_labels_ignore_profile() {
        let extra = BTreeMap::new();
        let recommended = label_set(LabelProfile::Recommended, &extra);
        let legacy = label_set(LabelProfile::Legacy, &extra);

        assert_eq!(recommended.main_deployment(), legacy.main_deployment());
        assert_eq!(recommended.worker(), legacy.worker());
        assert!(!recommended.main_deployment().contains_key(LABEL_NAME));
        assert!(!recommended.worker().contains_key(LABEL_HELM_CHART));
        assert!(recommended.service().contains_key(LABEL_NAME));
        assert!(!legacy.service().contains_key(LABEL_NAME));
    }

    #[test]
    fn test_worker_labels_have_no_app() {
        let extra = BTreeMap::new();
        let set = label_set(LabelProfile::Legacy, &extra);

        assert!(!set.worker().contains_key(LABEL_APP));
        assert!(!set.worker_selector().contains_key(LABEL_APP));
        assert_eq!(set.worker()[LABEL_TIER], "worker");
    }

    #[test]
    fn test_extra_labels_never_override_reserved() {
        let extra = BTreeMap::from([
            (String::from("team"), String::from("myteam")),
            (String::from("app"), String::from("hijacked")),
            (String::from("tier"), String::from("db")),
        ]);
        let set = label_set(LabelProfile::Legacy, &extra);

        let labels = set.main_deployment();
        assert_eq!(labels["team"], "myteam");
        assert_eq!(labels[LABEL_APP], "production");
        assert_eq!(labels[LABEL_TIER], "web");

        // selectors carry no extra labels
        assert!(!set.main_selector().contains_key("team"));
        // workers stay without app even when an extra label names it
        assert!(!set.worker().contains_key(LABEL_APP));
    }

    #[test]
    fn test_selectors_subset_of_labels() {
        let extra = BTreeMap::new();
        let set = label_set(LabelProfile::Recommended, &extra);

        let main = set.main_deployment();
        for (key, value) in set.main_selector() {
            assert_eq!(main.get(&key), Some(&value));
        }

        let worker = set.worker();
        for (key, value) in set.worker_selector() {
            assert_eq!(worker.get(&key), Some(&value));
        }
    }
}
