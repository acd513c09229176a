//! Manifest intent types.
//!
//! An intent is the structured shape a renderer must emit for one manifest:
//! its name, labels, selector, annotations, probes and strategy. Intents are
//! plain data and never serialized as Kubernetes YAML by this crate.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::chart::ChartVersion;
use crate::config::{ConfigHasher, ProbeScheme, Release, ResourcesConfig, StrategyType, Track};
use crate::error::Result;

/// Metadata common to every manifest.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
    /// Labels.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Creates metadata with no labels or annotations.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }

    /// Replaces the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    /// Replaces the annotations.
    #[must_use]
    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }
}

/// Workload tier.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The main, service-backed deployment.
    Web,
    /// A background worker deployment.
    Worker,
}

impl Tier {
    /// Returns the tier label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Worker => "worker",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe kind.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Restarts the container when failing.
    Liveness,
    /// Removes the pod from endpoints when failing.
    Readiness,
}

/// What a probe does.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProbeAction {
    /// HTTP GET against the container.
    HttpGet {
        /// Request path.
        path: String,
        /// Container port.
        port: u32,
        /// URI scheme.
        scheme: ProbeScheme,
    },
    /// TCP connect to the container.
    TcpSocket {
        /// Container port.
        port: u32,
    },
    /// Command executed in the container.
    Exec {
        /// Command and arguments.
        command: Vec<String>,
    },
}

/// A resolved container probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    /// Liveness or readiness.
    pub kind: ProbeKind,
    /// Probe mechanism.
    pub action: ProbeAction,
    /// Seconds before the first probe.
    pub initial_delay_seconds: u32,
    /// Seconds before a probe times out.
    pub timeout_seconds: u32,
}

/// The single container of a workload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Image pull policy.
    pub image_pull_policy: String,
    /// Command; empty means the image entrypoint.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Container port.
    pub port: u32,
    /// Liveness probe.
    pub liveness_probe: Probe,
    /// Readiness probe.
    pub readiness_probe: Probe,
    /// Resource requests and limits.
    pub resources: ResourcesConfig,
}

/// A Deployment intent, for the main workload or a worker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    /// Deployment metadata.
    pub metadata: ObjectMeta,
    /// Worker key, `None` for the main workload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
    /// Tier.
    pub tier: Tier,
    /// Track.
    pub track: Track,
    /// Replica count.
    pub replicas: u32,
    /// Strategy type; `None` leaves the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<StrategyType>,
    /// Selector match labels.
    pub selector: BTreeMap<String, String>,
    /// Pod template labels; always equal to the selector.
    pub pod_labels: BTreeMap<String, String>,
    /// Pod template annotations.
    pub pod_annotations: BTreeMap<String, String>,
    /// The container.
    pub container: Container,
}

impl WorkloadSpec {
    /// Returns the deployment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns true for a worker deployment.
    #[must_use]
    pub const fn is_worker(&self) -> bool {
        self.worker.is_some()
    }
}

/// A Service intent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIntent {
    /// Service metadata.
    pub metadata: ObjectMeta,
    /// Service type.
    pub service_type: String,
    /// Pod selector.
    pub selector: BTreeMap<String, String>,
    /// Port exposed by the service.
    pub external_port: u32,
    /// Container port targeted.
    pub internal_port: u32,
}

/// TLS policy of an ingress.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TlsPolicy {
    /// No TLS block.
    Disabled,
    /// TLS block without a secret; the controller's default certificate.
    DefaultSecret,
    /// TLS block with the named secret.
    Secret(String),
}

impl TlsPolicy {
    /// Returns true unless TLS is disabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Returns the secret name, if any.
    #[must_use]
    pub fn secret_name(&self) -> Option<&str> {
        match self {
            Self::Secret(name) => Some(name),
            Self::Disabled | Self::DefaultSecret => None,
        }
    }
}

/// An Ingress intent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngressIntent {
    /// Ingress metadata.
    pub metadata: ObjectMeta,
    /// Primary host followed by additional hosts.
    pub hosts: Vec<String>,
    /// Routed path.
    pub path: String,
    /// Backend service name.
    pub service_name: String,
    /// Backend service port.
    pub service_port: u32,
    /// TLS policy.
    pub tls: TlsPolicy,
}

impl IngressIntent {
    /// Returns the primary host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.hosts.first().map(String::as_str)
    }
}

/// A `HorizontalPodAutoscaler` intent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HpaIntent {
    /// Autoscaler metadata.
    pub metadata: ObjectMeta,
    /// Name of the scaled deployment.
    pub scale_target: String,
    /// Minimum replicas.
    pub min_replicas: u32,
    /// Maximum replicas.
    pub max_replicas: u32,
    /// Target average CPU utilization.
    #[serde(rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: u32,
}

/// Database job kinds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum JobKind {
    /// Runs once after install.
    Initialize,
    /// Runs before every upgrade.
    Migrate,
}

impl JobKind {
    /// Returns the Helm hook the job is bound to.
    #[must_use]
    pub const fn hook(self) -> &'static str {
        match self {
            Self::Initialize => "post-install",
            Self::Migrate => "pre-upgrade",
        }
    }

    /// Returns the job name suffix.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Initialize => "db-initialize",
            Self::Migrate => "db-migrate",
        }
    }
}

/// A database Job intent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobIntent {
    /// Job metadata.
    pub metadata: ObjectMeta,
    /// Initialize or migrate.
    pub job: JobKind,
    /// Image reference.
    pub image: String,
    /// Full command, `["/bin/sh", "-c", <cmd>]`.
    pub command: Vec<String>,
}

/// Borrowed view of one intent, in set order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum ManifestIntent<'a> {
    /// A deployment.
    Deployment(&'a WorkloadSpec),
    /// A service.
    Service(&'a ServiceIntent),
    /// An ingress.
    Ingress(&'a IngressIntent),
    /// An autoscaler.
    #[serde(rename = "HorizontalPodAutoscaler")]
    Hpa(&'a HpaIntent),
    /// A database job.
    Job(&'a JobIntent),
}

impl<'a> ManifestIntent<'a> {
    /// Returns the Kubernetes kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Deployment(_) => "Deployment",
            Self::Service(_) => "Service",
            Self::Ingress(_) => "Ingress",
            Self::Hpa(_) => "HorizontalPodAutoscaler",
            Self::Job(_) => "Job",
        }
    }

    /// Returns the intent metadata.
    #[must_use]
    pub const fn metadata(&self) -> &'a ObjectMeta {
        match *self {
            Self::Deployment(w) => &w.metadata,
            Self::Service(s) => &s.metadata,
            Self::Ingress(i) => &i.metadata,
            Self::Hpa(h) => &h.metadata,
            Self::Job(j) => &j.metadata,
        }
    }

    /// Returns the object name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.metadata().name
    }
}

/// Everything a renderer must emit for one release.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedManifestSet {
    /// The release resolved for.
    pub release: Release,
    /// The chart version recorded in labels.
    pub chart: ChartVersion,
    /// The main deployment.
    pub deployment: WorkloadSpec,
    /// Worker deployments, sorted by worker key.
    pub workers: Vec<WorkloadSpec>,
    /// The service, when enabled.
    pub service: Option<ServiceIntent>,
    /// The ingress, when gated in.
    pub ingress: Option<IngressIntent>,
    /// The autoscaler, when enabled with a CPU request.
    pub hpa: Option<HpaIntent>,
    /// The database initialize job.
    pub initialize_job: Option<JobIntent>,
    /// The database migrate hook.
    pub migrate_job: Option<JobIntent>,
}

impl ResolvedManifestSet {
    /// Returns every intent in emission order: main deployment, workers,
    /// service, ingress, autoscaler, initialize job, migrate hook.
    #[must_use]
    pub fn intents(&self) -> Vec<ManifestIntent<'_>> {
        let mut intents = vec![ManifestIntent::Deployment(&self.deployment)];
        intents.extend(self.workers.iter().map(ManifestIntent::Deployment));
        intents.extend(self.service.as_ref().map(ManifestIntent::Service));
        intents.extend(self.ingress.as_ref().map(ManifestIntent::Ingress));
        intents.extend(self.hpa.as_ref().map(ManifestIntent::Hpa));
        intents.extend(self.initialize_job.as_ref().map(ManifestIntent::Job));
        intents.extend(self.migrate_job.as_ref().map(ManifestIntent::Job));
        intents
    }

    /// Returns the worker deployment for a worker key.
    #[must_use]
    pub fn worker(&self, key: &str) -> Option<&WorkloadSpec> {
        self.workers.iter().find(|w| w.worker.as_deref() == Some(key))
    }

    /// Returns a SHA-256 fingerprint of the whole set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be encoded.
    pub fn fingerprint(&self) -> Result<String> {
        ConfigHasher::new().hash_manifests(self)
    }
}
