//! Configuration module for the auto-deploy resolver.
//!
//! This module handles everything before resolution:
//! - Parsing values files and `--set` expressions into one tree
//! - Coercing that tree into the typed `ChartValues`
//! - Validation of release identity and values
//! - Computing fingerprints for idempotence checks

mod coerce;
mod spec;
mod parser;
mod validator;
mod hash;

pub use spec::{
    ApplicationConfig, CanaryConfig, ChartValues, DEFAULT_NAMESPACE, GitlabConfig, HpaConfig,
    ImageConfig, IngressConfig, LabelsConfig, ModSecurityConfig, ProbeOverride, ProbeScheme,
    ProbeType, Release, ResourceList, ResourcesConfig, SecRule, ServiceConfig, StrategyType,
    TlsConfig, Track, WorkerConfig, kube_name,
};
pub use parser::{DEFAULT_VALUES_FILES, ValuesParser, find_values_file, merge};
pub use validator::{ConfigValidator, ReleaseValidator, ValidationError, ValidationResult};
pub use hash::ConfigHasher;
