//! Chart values specification types.
//!
//! This module defines the typed tree that the flat `--set` / values-file
//! configuration of the `auto-deploy-app` chart is parsed into. Every key
//! has a documented default, so an empty values tree is a valid
//! configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::coerce::{
    bool_like, opt_bool_like, opt_parsed, opt_string_like, opt_u32_like, string_like,
    string_list, string_map, u32_like,
};

/// Default Kubernetes namespace for a release.
pub const DEFAULT_NAMESPACE: &str = "default";

/// The root of the chart values tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartValues {
    /// Replaces the release name as the application name.
    #[serde(deserialize_with = "opt_string_like")]
    pub release_override: Option<String>,
    /// Suffix of the chart full name (`<release>-<nameOverride>`).
    #[serde(deserialize_with = "string_like")]
    pub name_override: String,
    /// Replicas of the main deployment.
    #[serde(deserialize_with = "u32_like")]
    pub replica_count: u32,
    /// Deployment strategy of the main deployment.
    #[serde(deserialize_with = "opt_parsed")]
    pub strategy_type: Option<StrategyType>,
    /// Container image.
    pub image: ImageConfig,
    /// GitLab environment metadata.
    pub gitlab: GitlabConfig,
    /// Application settings.
    pub application: ApplicationConfig,
    /// Service settings.
    pub service: ServiceConfig,
    /// Ingress settings.
    pub ingress: IngressConfig,
    /// Horizontal pod autoscaler settings.
    pub hpa: HpaConfig,
    /// Container resource requests and limits.
    pub resources: ResourcesConfig,
    /// Liveness probe of the main workload.
    pub liveness_probe: ProbeOverride,
    /// Readiness probe of the main workload.
    pub readiness_probe: ProbeOverride,
    /// Label scheme selection.
    pub labels: LabelsConfig,
    /// Additional labels merged onto every manifest.
    #[serde(deserialize_with = "string_map")]
    pub extra_labels: BTreeMap<String, String>,
    /// Additional pod template annotations.
    #[serde(deserialize_with = "string_map")]
    pub pod_annotations: BTreeMap<String, String>,
    /// Named worker deployments.
    pub workers: BTreeMap<String, WorkerConfig>,
}

/// Deployment strategy types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StrategyType {
    /// Kill all pods before creating new ones.
    Recreate,
    /// Replace pods progressively.
    RollingUpdate,
}

/// Container image configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageConfig {
    /// Image repository.
    #[serde(deserialize_with = "string_like")]
    pub repository: String,
    /// Image tag; empty means the repository reference is used as is.
    #[serde(deserialize_with = "string_like")]
    pub tag: String,
    /// Image pull policy.
    #[serde(deserialize_with = "string_like")]
    pub pull_policy: String,
}

/// GitLab environment metadata, surfaced as annotations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitlabConfig {
    /// Project path (`app.gitlab.com/app`).
    #[serde(deserialize_with = "opt_string_like")]
    pub app: Option<String>,
    /// Environment slug (`app.gitlab.com/env`).
    #[serde(deserialize_with = "opt_string_like")]
    pub env: Option<String>,
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationConfig {
    /// Deployment track.
    #[serde(deserialize_with = "track_like")]
    pub track: Track,
    /// Command run once after install to initialize the database.
    #[serde(deserialize_with = "opt_string_like")]
    pub initialize_command: Option<String>,
    /// Command run before every upgrade to migrate the database.
    #[serde(deserialize_with = "opt_string_like")]
    pub migrate_command: Option<String>,
    /// Checksum of the application secret, rolled into pod annotations.
    #[serde(deserialize_with = "string_like")]
    pub secret_checksum: String,
}

/// Deployment track of a release.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq, Hash)]
#[serde(into = "String")]
pub enum Track {
    /// The primary track.
    #[default]
    Stable,
    /// The canary track, routed by header or weight.
    Canary,
    /// Any other track name.
    Other(String),
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Whether the service (and thus the ingress) is rendered.
    #[serde(deserialize_with = "bool_like")]
    pub enabled: bool,
    /// Public URL; its host becomes the ingress host.
    #[serde(deserialize_with = "string_like")]
    pub url: String,
    /// Extra ingress hosts.
    #[serde(deserialize_with = "string_list")]
    pub additional_hosts: Vec<String>,
    /// Kubernetes service type.
    #[serde(rename = "type", deserialize_with = "string_like")]
    pub service_type: String,
    /// Port exposed by the service.
    #[serde(deserialize_with = "u32_like")]
    pub external_port: u32,
    /// Container port targeted by the service and probes.
    #[serde(deserialize_with = "u32_like")]
    pub internal_port: u32,
}

/// Ingress configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct IngressConfig {
    /// Whether the ingress is rendered; unset follows `service.enabled`.
    #[serde(deserialize_with = "opt_bool_like")]
    pub enabled: Option<bool>,
    /// HTTP path routed to the service.
    #[serde(deserialize_with = "string_like")]
    pub path: String,
    /// Extra annotations merged over the ingress class annotation.
    #[serde(deserialize_with = "string_map")]
    pub annotations: BTreeMap<String, String>,
    /// Legacy spelling of `ingress.tls.useDefaultSecret`.
    #[serde(deserialize_with = "opt_bool_like")]
    pub use_default_secret: Option<bool>,
    /// TLS settings.
    pub tls: TlsConfig,
    /// `ModSecurity` web application firewall settings.
    pub mod_security: ModSecurityConfig,
    /// Canary routing settings.
    pub canary: CanaryConfig,
}

/// Ingress TLS configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsConfig {
    /// Whether a TLS block is rendered.
    #[serde(deserialize_with = "bool_like")]
    pub enabled: bool,
    /// Value of the `kubernetes.io/tls-acme` annotation.
    #[serde(deserialize_with = "bool_like")]
    pub acme: bool,
    /// Use the ingress controller's default certificate.
    #[serde(deserialize_with = "opt_bool_like")]
    pub use_default_secret: Option<bool>,
    /// Explicit TLS secret name.
    #[serde(deserialize_with = "opt_string_like")]
    pub secret_name: Option<String>,
}

/// `ModSecurity` configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ModSecurityConfig {
    /// Whether `ModSecurity` annotations are rendered.
    #[serde(deserialize_with = "bool_like")]
    pub enabled: bool,
    /// `SecRuleEngine` mode.
    #[serde(deserialize_with = "string_like")]
    pub sec_rule_engine: String,
    /// Custom rules appended after the engine directive.
    pub sec_rules: Vec<SecRule>,
}

/// A single `ModSecurity` rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecRule {
    /// Rule variable, e.g. `REQUEST_HEADERS:User-Agent`.
    #[serde(deserialize_with = "string_like")]
    pub variable: String,
    /// Rule operator.
    #[serde(deserialize_with = "string_like")]
    pub operator: String,
    /// Rule action list.
    #[serde(deserialize_with = "string_like")]
    pub action: String,
}

/// Canary routing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanaryConfig {
    /// Percentage of traffic routed to the canary.
    #[serde(deserialize_with = "opt_u32_like")]
    pub weight: Option<u32>,
}

/// Horizontal pod autoscaler configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct HpaConfig {
    /// Whether the autoscaler is requested.
    #[serde(deserialize_with = "bool_like")]
    pub enabled: bool,
    /// Minimum replicas.
    #[serde(deserialize_with = "u32_like")]
    pub min_replicas: u32,
    /// Maximum replicas.
    #[serde(deserialize_with = "u32_like")]
    pub max_replicas: u32,
    /// Target average CPU utilization.
    #[serde(rename = "targetCPUUtilizationPercentage", deserialize_with = "u32_like")]
    pub target_cpu_utilization_percentage: u32,
}

/// Container resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Resource requests.
    pub requests: ResourceList,
    /// Resource limits.
    pub limits: ResourceList,
}

/// CPU and memory quantities.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResourceList {
    /// CPU quantity, e.g. `100m`.
    #[serde(deserialize_with = "opt_string_like")]
    pub cpu: Option<String>,
    /// Memory quantity, e.g. `128Mi`.
    #[serde(deserialize_with = "opt_string_like")]
    pub memory: Option<String>,
}

/// Probe settings as written in the values.
///
/// Every field is optional; resolution merges the set fields over a
/// constant default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeOverride {
    /// HTTP path.
    #[serde(deserialize_with = "opt_string_like")]
    pub path: Option<String>,
    /// HTTP scheme.
    #[serde(deserialize_with = "opt_parsed")]
    pub scheme: Option<ProbeScheme>,
    /// Probe mechanism.
    #[serde(deserialize_with = "opt_parsed")]
    pub probe_type: Option<ProbeType>,
    /// Seconds before the first probe.
    #[serde(deserialize_with = "opt_u32_like")]
    pub initial_delay_seconds: Option<u32>,
    /// Seconds before a probe times out.
    #[serde(deserialize_with = "opt_u32_like")]
    pub timeout_seconds: Option<u32>,
    /// Command for `exec` probes.
    #[serde(deserialize_with = "string_list")]
    pub command: Vec<String>,
}

/// HTTP probe scheme.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeScheme {
    /// Plain HTTP.
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

/// Probe mechanism.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProbeType {
    /// HTTP GET against the container port.
    #[default]
    HttpGet,
    /// TCP connect to the container port.
    TcpSocket,
    /// Command executed in the container.
    Exec,
}

/// Label scheme configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelsConfig {
    /// Add the `app.kubernetes.io/*` recommended labels.
    #[serde(deserialize_with = "bool_like")]
    pub use_recommended: bool,
}

/// A named worker deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkerConfig {
    /// Container command.
    #[serde(deserialize_with = "string_list")]
    pub command: Vec<String>,
    /// Worker replicas; defaults to 1.
    #[serde(deserialize_with = "opt_u32_like")]
    pub replica_count: Option<u32>,
    /// Deployment strategy of this worker.
    #[serde(deserialize_with = "opt_parsed")]
    pub strategy_type: Option<StrategyType>,
    /// Liveness probe settings of this worker.
    pub liveness_probe: ProbeOverride,
    /// Readiness probe settings of this worker.
    pub readiness_probe: ProbeOverride,
}

/// Identity of a Helm release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// Release name.
    pub name: String,
    /// Target namespace.
    pub namespace: String,
}

// Default value implementations

impl Default for ChartValues {
    fn default() -> Self {
        Self {
            release_override: None,
            name_override: String::from("auto-deploy"),
            replica_count: 1,
            strategy_type: None,
            image: ImageConfig::default(),
            gitlab: GitlabConfig::default(),
            application: ApplicationConfig::default(),
            service: ServiceConfig::default(),
            ingress: IngressConfig::default(),
            hpa: HpaConfig::default(),
            resources: ResourcesConfig::default(),
            liveness_probe: ProbeOverride::default(),
            readiness_probe: ProbeOverride::default(),
            labels: LabelsConfig::default(),
            extra_labels: BTreeMap::new(),
            pod_annotations: BTreeMap::new(),
            workers: BTreeMap::new(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            repository: String::from("gitlab.example.com/group/project"),
            tag: String::from("stable"),
            pull_policy: String::from("IfNotPresent"),
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            track: Track::Stable,
            initialize_command: None,
            migrate_command: None,
            secret_checksum: String::new(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: String::from("http://my.host.com/"),
            additional_hosts: Vec::new(),
            service_type: String::from("ClusterIP"),
            external_port: 5000,
            internal_port: 5000,
        }
    }
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            path: String::from("/"),
            annotations: BTreeMap::new(),
            use_default_secret: None,
            tls: TlsConfig::default(),
            mod_security: ModSecurityConfig::default(),
            canary: CanaryConfig::default(),
        }
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            acme: true,
            use_default_secret: None,
            secret_name: None,
        }
    }
}

impl Default for ModSecurityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sec_rule_engine: String::from("DetectionOnly"),
            sec_rules: Vec::new(),
        }
    }
}

impl Default for HpaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_replicas: 1,
            max_replicas: 5,
            target_cpu_utilization_percentage: 80,
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            use_recommended: true,
        }
    }
}

fn track_like<'de, D>(deserializer: D) -> Result<Track, D::Error>
where
    D: Deserializer<'de>,
{
    string_like(deserializer).map(Track::from)
}

// String conversions

impl From<String> for Track {
    fn from(s: String) -> Self {
        match s.trim() {
            "" | "stable" => Self::Stable,
            "canary" => Self::Canary,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<Track> for String {
    fn from(track: Track) -> Self {
        track.as_str().to_string()
    }
}

impl Track {
    /// Returns the track name as used in labels.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stable => "stable",
            Self::Canary => "canary",
            Self::Other(name) => name,
        }
    }

    /// Returns true for the stable track.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }

    /// Returns true for the canary track.
    #[must_use]
    pub const fn is_canary(&self) -> bool {
        matches!(self, Self::Canary)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recreate" => Ok(Self::Recreate),
            "RollingUpdate" => Ok(Self::RollingUpdate),
            other => Err(format!(
                "Invalid strategy type: {other}. Expected: Recreate or RollingUpdate"
            )),
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Recreate => "Recreate",
            Self::RollingUpdate => "RollingUpdate",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ProbeScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HTTP" => Ok(Self::Http),
            "HTTPS" => Ok(Self::Https),
            _ => Err(format!("Invalid probe scheme: {s}. Expected: HTTP or HTTPS")),
        }
    }
}

impl fmt::Display for ProbeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ProbeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "httpGet" => Ok(Self::HttpGet),
            "tcpSocket" => Ok(Self::TcpSocket),
            "exec" => Ok(Self::Exec),
            other => Err(format!(
                "Invalid probe type: {other}. Expected: httpGet, tcpSocket, or exec"
            )),
        }
    }
}

impl ChartValues {
    /// Returns the application name for a release.
    ///
    /// `releaseOverride` wins over the release name.
    #[must_use]
    pub fn app_name(&self, release: &Release) -> String {
        let base = self
            .release_override
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&release.name);
        kube_name(base)
    }

    /// Returns the chart full name, `<release>-<nameOverride>`.
    #[must_use]
    pub fn full_name(&self, release: &Release) -> String {
        kube_name(&format!("{}-{}", release.name, self.name_override))
    }

    /// Returns whether the ingress is enabled, following `service.enabled`
    /// when unset.
    #[must_use]
    pub fn ingress_enabled(&self) -> bool {
        self.ingress.enabled.unwrap_or(self.service.enabled)
    }

    /// Returns whether the ingress should use the controller's default
    /// certificate. The TLS-scoped key wins over the legacy spelling.
    #[must_use]
    pub fn use_default_secret(&self) -> bool {
        self.ingress
            .tls
            .use_default_secret
            .or(self.ingress.use_default_secret)
            .unwrap_or(false)
    }

    /// Returns the full image reference.
    #[must_use]
    pub fn image_reference(&self) -> String {
        if self.image.tag.is_empty() {
            self.image.repository.clone()
        } else {
            format!("{}:{}", self.image.repository, self.image.tag)
        }
    }

    /// Returns true when a CPU request is configured.
    #[must_use]
    pub fn has_cpu_request(&self) -> bool {
        self.resources
            .requests
            .cpu
            .as_deref()
            .is_some_and(|cpu| !cpu.trim().is_empty())
    }

    /// Returns worker keys in resolution order.
    #[must_use]
    pub fn worker_names(&self) -> Vec<&str> {
        self.workers.keys().map(String::as_str).collect()
    }
}

impl ProbeOverride {
    /// Returns true when this override replaces the default probe.
    ///
    /// Only `path`, `scheme` and `probeType` count; delays alone do not.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.path.is_some() || self.scheme.is_some() || self.probe_type.is_some()
    }
}

impl WorkerConfig {
    /// Returns the liveness override, if this worker sets one.
    #[must_use]
    pub fn liveness_override(&self) -> Option<&ProbeOverride> {
        Some(&self.liveness_probe).filter(|p| p.is_override())
    }

    /// Returns the readiness override, if this worker sets one.
    #[must_use]
    pub fn readiness_override(&self) -> Option<&ProbeOverride> {
        Some(&self.readiness_probe).filter(|p| p.is_override())
    }
}

impl Release {
    /// Creates a release in the default namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::from(DEFAULT_NAMESPACE),
        }
    }

    /// Sets the target namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Truncates a name to the 63-character object-name limit and trims a
/// trailing hyphen.
#[must_use]
pub fn kube_name(name: &str) -> String {
    let truncated: String = name.chars().take(63).collect();
    truncated.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let values = ChartValues::default();
        assert!(values.service.enabled);
        assert!(values.ingress_enabled());
        assert!(values.ingress.tls.enabled);
        assert!(values.labels.use_recommended);
        assert_eq!(values.application.track, Track::Stable);
        assert_eq!(values.hpa.min_replicas, 1);
        assert_eq!(values.hpa.max_replicas, 5);
        assert_eq!(values.hpa.target_cpu_utilization_percentage, 80);
        assert_eq!(values.service.internal_port, 5000);
    }

    #[test]
    fn test_app_name_prefers_override() {
        let release = Release::new("production");
        let mut values = ChartValues::default();
        assert_eq!(values.app_name(&release), "production");

        values.release_override = Some(String::from("productionOverridden"));
        assert_eq!(values.app_name(&release), "productionOverridden");
        assert_eq!(values.full_name(&release), "production-auto-deploy");
    }

    #[test]
    fn test_ingress_follows_service_when_unset() {
        let mut values = ChartValues::default();
        values.service.enabled = false;
        assert!(!values.ingress_enabled());

        values.ingress.enabled = Some(true);
        assert!(values.ingress_enabled());
    }

    #[test]
    fn test_use_default_secret_aliases() {
        let mut values = ChartValues::default();
        assert!(!values.use_default_secret());

        values.ingress.use_default_secret = Some(true);
        assert!(values.use_default_secret());

        values.ingress.tls.use_default_secret = Some(false);
        assert!(!values.use_default_secret());
    }

    #[test]
    fn test_image_reference() {
        let mut values = ChartValues::default();
        values.image.repository = String::from("skaffold");
        values.image.tag = String::new();
        assert_eq!(values.image_reference(), "skaffold");

        values.image.tag = String::from("stable");
        assert_eq!(values.image_reference(), "skaffold:stable");
    }

    #[test]
    fn test_track_round_trip_names() {
        assert_eq!(Track::from(String::from("canary")), Track::Canary);
        assert_eq!(
            Track::from(String::from("non-stable")),
            Track::Other(String::from("non-stable"))
        );
        assert_eq!(String::from(Track::Stable), "stable");
    }

    #[test]
    fn test_probe_override_detection() {
        let mut probe = ProbeOverride {
            initial_delay_seconds: Some(3),
            ..ProbeOverride::default()
        };
        assert!(!probe.is_override());

        probe.path = Some(String::from("/worker"));
        assert!(probe.is_override());
    }

    #[test]
    fn test_kube_name_truncates() {
        let long = format!("{}-x", "a".repeat(62));
        assert_eq!(kube_name(&long), "a".repeat(62));
    }

    #[test]
    fn test_strategy_type_parse() {
        assert_eq!("Recreate".parse::<StrategyType>(), Ok(StrategyType::Recreate));
        assert!("Sideways".parse::<StrategyType>().is_err());
    }
}
