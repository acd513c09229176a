//! The manifest resolver.
//!
//! [`ManifestResolver::resolve`] is a pure function from chart values and a
//! release identity to the set of manifest intents a conformant renderer
//! must emit. It validates the release first and never produces a partial
//! set.

use std::collections::BTreeMap;
use std::fmt::Write;
use tracing::{debug, info};

use crate::chart::{ChartVersion, GITLAB_MANAGED_CHART_NAME};
use crate::config::{ChartValues, Release, ReleaseValidator, Track, WorkerConfig, kube_name};
use crate::error::ResolveError;

use super::intents::{
    Container, HpaIntent, IngressIntent, JobIntent, JobKind, ObjectMeta, ProbeKind,
    ResolvedManifestSet, ServiceIntent, Tier, TlsPolicy, WorkloadSpec,
};
use super::labels::{LabelProfile, LabelSet};
use super::probes::{main_probe, worker_probe};

/// GitLab project annotation.
pub const ANNOTATION_GITLAB_APP: &str = "app.gitlab.com/app";
/// GitLab environment annotation.
pub const ANNOTATION_GITLAB_ENV: &str = "app.gitlab.com/env";
/// Pod template annotation rolling pods on secret changes.
pub const ANNOTATION_SECRET_CHECKSUM: &str = "checksum/application-secrets";
/// Ingress class annotation.
pub const ANNOTATION_INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
/// Certificate issuance annotation.
pub const ANNOTATION_TLS_ACME: &str = "kubernetes.io/tls-acme";
/// `ModSecurity` transaction id annotation.
pub const ANNOTATION_MODSECURITY_TRANSACTION_ID: &str =
    "nginx.ingress.kubernetes.io/modsecurity-transaction-id";
/// `ModSecurity` snippet annotation.
pub const ANNOTATION_MODSECURITY_SNIPPET: &str = "nginx.ingress.kubernetes.io/modsecurity-snippet";
/// Canary marker annotation.
pub const ANNOTATION_CANARY: &str = "nginx.ingress.kubernetes.io/canary";
/// Canary header routing annotation.
pub const ANNOTATION_CANARY_BY_HEADER: &str = "nginx.ingress.kubernetes.io/canary-by-header";
/// Canary weight annotation.
pub const ANNOTATION_CANARY_WEIGHT: &str = "nginx.ingress.kubernetes.io/canary-weight";
/// Helm hook annotation.
pub const ANNOTATION_HELM_HOOK: &str = "helm.sh/hook";

/// Default ingress class.
pub const DEFAULT_INGRESS_CLASS: &str = "nginx";
/// `ModSecurity` transaction id value.
pub const MODSECURITY_TRANSACTION_ID: &str = "$server_name-$request_id";
/// Header that routes requests to the canary.
pub const CANARY_HEADER: &str = "canary";

/// Resolver from chart values to manifest intents.
#[derive(Debug, Clone, Default)]
pub struct ManifestResolver {
    /// Chart version recorded in `chart` labels.
    chart: ChartVersion,
    /// Release identity validator.
    validator: ReleaseValidator,
}

/// Per-release inputs shared by every intent.
struct Context<'a> {
    values: &'a ChartValues,
    release: &'a Release,
    app_name: String,
    full_name: String,
    image: String,
}

impl ManifestResolver {
    /// Creates a resolver for the default chart version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chart version recorded in labels.
    #[must_use]
    pub const fn with_chart(mut self, chart: ChartVersion) -> Self {
        self.chart = chart;
        self
    }

    /// Returns the chart version recorded in labels.
    #[must_use]
    pub const fn chart(&self) -> ChartVersion {
        self.chart
    }

    /// Resolves every manifest intent for a release.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ReleaseNameTooLong`] when the release name
    /// exceeds 53 bytes; nothing is resolved in that case.
    pub fn resolve(
        &self,
        values: &ChartValues,
        release: &Release,
    ) -> Result<ResolvedManifestSet, ResolveError> {
        self.validator.validate_release(release)?;

        let ctx = Context {
            values,
            release,
            app_name: values.app_name(release),
            full_name: values.full_name(release),
            image: values.image_reference(),
        };

        let chart_label = self.chart.chart_label();
        let track = values.application.track.as_str();
        let labels = LabelSet::new(
            LabelProfile::from_values(values),
            &ctx.app_name,
            &release.name,
            &chart_label,
            track,
            &values.extra_labels,
        );

        debug!(
            "Resolving release {} (app {}, track {track})",
            release.name, ctx.app_name
        );

        let deployment = Self::main_deployment(&ctx, &labels);
        let workers: Vec<_> = values
            .workers
            .iter()
            .map(|(key, worker)| Self::worker_deployment(&ctx, &labels, &deployment, key, worker))
            .collect();

        let set = ResolvedManifestSet {
            release: release.clone(),
            chart: self.chart,
            service: Self::service(&ctx, &labels),
            ingress: Self::ingress(&ctx, &labels),
            hpa: Self::hpa(&ctx, &labels, deployment.name()),
            initialize_job: Self::job(
                &ctx,
                &labels,
                JobKind::Initialize,
                values.application.initialize_command.as_deref(),
            ),
            migrate_job: Self::job(
                &ctx,
                &labels,
                JobKind::Migrate,
                values.application.migrate_command.as_deref(),
            ),
            deployment,
            workers,
        };

        info!(
            "Resolved {} manifest intent(s) for release {}",
            set.intents().len(),
            release.name
        );
        Ok(set)
    }

    fn main_deployment(ctx: &Context<'_>, labels: &LabelSet<'_>) -> WorkloadSpec {
        let values = ctx.values;
        let port = values.service.internal_port;
        let selector = labels.main_selector();

        WorkloadSpec {
            metadata: ObjectMeta::new(&ctx.app_name, &ctx.release.namespace)
                .with_labels(labels.main_deployment())
                .with_annotations(gitlab_annotations(values)),
            worker: None,
            tier: Tier::Web,
            track: values.application.track.clone(),
            replicas: values.replica_count,
            strategy_type: values.strategy_type,
            pod_labels: selector.clone(),
            selector,
            pod_annotations: pod_annotations(values),
            container: Container {
                name: GITLAB_MANAGED_CHART_NAME.to_string(),
                image: ctx.image.clone(),
                image_pull_policy: values.image.pull_policy.clone(),
                command: Vec::new(),
                port,
                liveness_probe: main_probe(ProbeKind::Liveness, &values.liveness_probe, port),
                readiness_probe: main_probe(ProbeKind::Readiness, &values.readiness_probe, port),
                resources: values.resources.clone(),
            },
        }
    }

    fn worker_deployment(
        ctx: &Context<'_>,
        labels: &LabelSet<'_>,
        main: &WorkloadSpec,
        key: &str,
        worker: &WorkerConfig,
    ) -> WorkloadSpec {
        let values = ctx.values;
        let port = values.service.internal_port;
        let selector = labels.worker_selector();

        debug!("Resolving worker {key}");

        WorkloadSpec {
            metadata: ObjectMeta::new(
                kube_name(&format!("{}-{key}", ctx.app_name)),
                &ctx.release.namespace,
            )
            .with_labels(labels.worker())
            .with_annotations(gitlab_annotations(values)),
            worker: Some(key.to_string()),
            tier: Tier::Worker,
            track: values.application.track.clone(),
            replicas: worker.replica_count.unwrap_or(1),
            strategy_type: worker.strategy_type,
            pod_labels: selector.clone(),
            selector,
            pod_annotations: pod_annotations(values),
            container: Container {
                name: format!("{GITLAB_MANAGED_CHART_NAME}-{key}"),
                image: ctx.image.clone(),
                image_pull_policy: values.image.pull_policy.clone(),
                command: worker.command.clone(),
                port,
                liveness_probe: worker_probe(
                    ProbeKind::Liveness,
                    worker.liveness_override(),
                    &main.container.liveness_probe,
                    port,
                ),
                readiness_probe: worker_probe(
                    ProbeKind::Readiness,
                    worker.readiness_override(),
                    &main.container.readiness_probe,
                    port,
                ),
                resources: values.resources.clone(),
            },
        }
    }

    fn service(ctx: &Context<'_>, labels: &LabelSet<'_>) -> Option<ServiceIntent> {
        let service = &ctx.values.service;
        if !service.enabled {
            debug!("Service disabled");
            return None;
        }

        Some(ServiceIntent {
            metadata: ObjectMeta::new(&ctx.full_name, &ctx.release.namespace)
                .with_labels(labels.service()),
            service_type: service.service_type.clone(),
            selector: labels.service_selector(),
            external_port: service.external_port,
            internal_port: service.internal_port,
        })
    }

    fn ingress(ctx: &Context<'_>, labels: &LabelSet<'_>) -> Option<IngressIntent> {
        let values = ctx.values;
        let track = &values.application.track;

        if !(values.service.enabled && values.ingress_enabled()) {
            debug!("Ingress disabled");
            return None;
        }
        if !matches!(track, Track::Stable | Track::Canary) {
            debug!("No ingress for track {track}");
            return None;
        }

        let tls = tls_policy(values, &ctx.full_name);
        let mut hosts = vec![hostname(&values.service.url)];
        hosts.extend(values.service.additional_hosts.iter().cloned());

        Some(IngressIntent {
            metadata: ObjectMeta::new(&ctx.full_name, &ctx.release.namespace)
                .with_labels(labels.base())
                .with_annotations(ingress_annotations(values, &tls)),
            hosts,
            path: values.ingress.path.clone(),
            service_name: ctx.full_name.clone(),
            service_port: values.service.external_port,
            tls,
        })
    }

    fn hpa(ctx: &Context<'_>, labels: &LabelSet<'_>, target: &str) -> Option<HpaIntent> {
        let values = ctx.values;
        if !values.hpa.enabled {
            return None;
        }
        if !values.has_cpu_request() {
            debug!("Autoscaler requested without a CPU request");
            return None;
        }

        Some(HpaIntent {
            metadata: ObjectMeta::new(&ctx.full_name, &ctx.release.namespace)
                .with_labels(labels.base()),
            scale_target: target.to_string(),
            min_replicas: values.hpa.min_replicas,
            max_replicas: values.hpa.max_replicas,
            target_cpu_utilization_percentage: values.hpa.target_cpu_utilization_percentage,
        })
    }

    fn job(
        ctx: &Context<'_>,
        labels: &LabelSet<'_>,
        kind: JobKind,
        command: Option<&str>,
    ) -> Option<JobIntent> {
        let command = command.map(str::trim).filter(|c| !c.is_empty())?;

        let annotations = BTreeMap::from([(
            ANNOTATION_HELM_HOOK.to_string(),
            kind.hook().to_string(),
        )]);

        Some(JobIntent {
            metadata: ObjectMeta::new(
                kube_name(&format!("{}-{}", ctx.app_name, kind.suffix())),
                &ctx.release.namespace,
            )
            .with_labels(labels.base())
            .with_annotations(annotations),
            job: kind,
            image: ctx.image.clone(),
            command: vec![
                String::from("/bin/sh"),
                String::from("-c"),
                command.to_string(),
            ],
        })
    }
}

fn gitlab_annotations(values: &ChartValues) -> BTreeMap<String, String> {
    let mut annotations = BTreeMap::new();
    if let Some(app) = values.gitlab.app.as_deref().filter(|s| !s.is_empty()) {
        annotations.insert(ANNOTATION_GITLAB_APP.to_string(), app.to_string());
    }
    if let Some(env) = values.gitlab.env.as_deref().filter(|s| !s.is_empty()) {
        annotations.insert(ANNOTATION_GITLAB_ENV.to_string(), env.to_string());
    }
    annotations
}

/// User pod annotations, then the chart-owned ones.
fn pod_annotations(values: &ChartValues) -> BTreeMap<String, String> {
    let mut annotations = values.pod_annotations.clone();
    annotations.extend(gitlab_annotations(values));
    annotations.insert(
        ANNOTATION_SECRET_CHECKSUM.to_string(),
        values.application.secret_checksum.clone(),
    );
    annotations
}

fn tls_policy(values: &ChartValues, full_name: &str) -> TlsPolicy {
    let tls = &values.ingress.tls;
    if !tls.enabled {
        TlsPolicy::Disabled
    } else if values.use_default_secret() {
        TlsPolicy::DefaultSecret
    } else {
        let secret = tls
            .secret_name
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{full_name}-tls"));
        TlsPolicy::Secret(secret)
    }
}

fn ingress_annotations(values: &ChartValues, tls: &TlsPolicy) -> BTreeMap<String, String> {
    let ingress = &values.ingress;
    let mut annotations = BTreeMap::from([(
        ANNOTATION_INGRESS_CLASS.to_string(),
        DEFAULT_INGRESS_CLASS.to_string(),
    )]);
    annotations.extend(ingress.annotations.clone());

    if tls.is_enabled() {
        annotations.insert(ANNOTATION_TLS_ACME.to_string(), ingress.tls.acme.to_string());
    }

    if ingress.mod_security.enabled {
        annotations.insert(
            ANNOTATION_MODSECURITY_TRANSACTION_ID.to_string(),
            MODSECURITY_TRANSACTION_ID.to_string(),
        );
        annotations.insert(
            ANNOTATION_MODSECURITY_SNIPPET.to_string(),
            modsecurity_snippet(values),
        );
    }

    if values.application.track.is_canary() {
        annotations.insert(ANNOTATION_CANARY.to_string(), String::from("true"));
        annotations.insert(
            ANNOTATION_CANARY_BY_HEADER.to_string(),
            CANARY_HEADER.to_string(),
        );
        if let Some(weight) = ingress.canary.weight {
            annotations.insert(ANNOTATION_CANARY_WEIGHT.to_string(), weight.to_string());
        }
    }

    annotations
}

/// `SecRuleEngine <mode>` followed by one escaped `SecRule` line per rule.
fn modsecurity_snippet(values: &ChartValues) -> String {
    let mod_security = &values.ingress.mod_security;
    let mut snippet = format!("SecRuleEngine {}\n", mod_security.sec_rule_engine);

    for rule in &mod_security.sec_rules {
        let _ = writeln!(
            snippet,
            "SecRule {} \\\"{}\\\" \\\"{}\\\"",
            rule.variable,
            escape_quotes(&rule.operator),
            escape_quotes(&rule.action),
        );
    }

    snippet
}

fn escape_quotes(input: &str) -> String {
    input.replace('\'', "\\'").replace('"', "\\\"")
}

/// Host part of the service URL.
fn hostname(url: &str) -> String {
    url.trim()
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/')
        .trim()
        .to_string()
}
