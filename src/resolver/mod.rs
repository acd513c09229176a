//! Resolution module.
//!
//! This module turns chart values and a release identity into the manifest
//! intents a renderer must emit:
//! - Intent types for deployments, service, ingress, autoscaler and jobs
//! - Label and selector composition
//! - Probe defaults and override merging
//! - Per-template lookup of the resolved set

mod intents;
mod labels;
mod probes;
mod resolve;
mod templates;

pub use intents::{
    Container, HpaIntent, IngressIntent, JobIntent, JobKind, ManifestIntent, ObjectMeta, Probe,
    ProbeAction, ProbeKind, ResolvedManifestSet, ServiceIntent, Tier, TlsPolicy, WorkloadSpec,
};
pub use labels::{
    HERITAGE, LABEL_APP, LABEL_CHART, LABEL_HELM_CHART, LABEL_HERITAGE, LABEL_INSTANCE,
    LABEL_MANAGED_BY, LABEL_NAME, LABEL_RELEASE, LABEL_TIER, LABEL_TRACK, LabelProfile, LabelSet,
    RESERVED_LABELS, is_reserved,
};
pub use probes::{
    BARE_TIMINGS, DEFAULT_PROBE_PATH, LIVENESS_TIMINGS, ProbeTimings, READINESS_TIMINGS,
    main_probe, merge_probe, worker_probe,
};
pub use resolve::{
    ANNOTATION_CANARY, ANNOTATION_CANARY_BY_HEADER, ANNOTATION_CANARY_WEIGHT,
    ANNOTATION_GITLAB_APP, ANNOTATION_GITLAB_ENV, ANNOTATION_HELM_HOOK, ANNOTATION_INGRESS_CLASS,
    ANNOTATION_MODSECURITY_SNIPPET, ANNOTATION_MODSECURITY_TRANSACTION_ID,
    ANNOTATION_SECRET_CHECKSUM, ANNOTATION_TLS_ACME, CANARY_HEADER, DEFAULT_INGRESS_CLASS,
    MODSECURITY_TRANSACTION_ID, ManifestResolver,
};
pub use templates::TemplateKind;
