//! Probe resolution.
//!
//! Every probe is a constant default with the set fields of a
//! [`ProbeOverride`] merged over it.

use crate::config::{ProbeOverride, ProbeScheme, ProbeType};

use super::intents::{Probe, ProbeAction, ProbeKind};

/// Default HTTP probe path.
pub const DEFAULT_PROBE_PATH: &str = "/";

/// Delays applied when a probe sets none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimings {
    /// Seconds before the first probe.
    pub initial_delay_seconds: u32,
    /// Seconds before a probe times out.
    pub timeout_seconds: u32,
}

/// Liveness defaults of the main workload.
pub const LIVENESS_TIMINGS: ProbeTimings = ProbeTimings {
    initial_delay_seconds: 15,
    timeout_seconds: 15,
};

/// Readiness defaults of the main workload.
pub const READINESS_TIMINGS: ProbeTimings = ProbeTimings {
    initial_delay_seconds: 5,
    timeout_seconds: 3,
};

/// Defaults under a worker's own probe; the platform fills in zeros.
pub const BARE_TIMINGS: ProbeTimings = ProbeTimings {
    initial_delay_seconds: 0,
    timeout_seconds: 0,
};

impl ProbeKind {
    /// Returns the default timings of this kind.
    #[must_use]
    pub const fn default_timings(self) -> ProbeTimings {
        match self {
            Self::Liveness => LIVENESS_TIMINGS,
            Self::Readiness => READINESS_TIMINGS,
        }
    }
}

/// Merges `probe` over a default `httpGet` probe on `port`.
#[must_use]
pub fn merge_probe(kind: ProbeKind, timings: ProbeTimings, probe: &ProbeOverride, port: u32) -> Probe {
    let action = match probe.probe_type.unwrap_or_default() {
        ProbeType::HttpGet => ProbeAction::HttpGet {
            path: probe
                .path
                .clone()
                .unwrap_or_else(|| DEFAULT_PROBE_PATH.to_string()),
            port,
            scheme: probe.scheme.unwrap_or(ProbeScheme::Http),
        },
        ProbeType::TcpSocket => ProbeAction::TcpSocket { port },
        ProbeType::Exec => ProbeAction::Exec {
            command: probe.command.clone(),
        },
    };

    Probe {
        kind,
        action,
        initial_delay_seconds: probe
            .initial_delay_seconds
            .unwrap_or(timings.initial_delay_seconds),
        timeout_seconds: probe.timeout_seconds.unwrap_or(timings.timeout_seconds),
    }
}

/// Resolves a probe of the main workload.
#[must_use]
pub fn main_probe(kind: ProbeKind, probe: &ProbeOverride, port: u32) -> Probe {
    merge_probe(kind, kind.default_timings(), probe, port)
}

/// Resolves a worker probe: its own override over bare timings, or the
/// main workload's probe when it sets none.
#[must_use]
pub fn worker_probe(
    kind: ProbeKind,
    probe: Option<&ProbeOverride>,
    inherited: &Probe,
    port: u32,
) -> Probe {
    probe.map_or_else(
        || inherited.clone(),
        |probe| merge_probe(kind, BARE_TIMINGS, probe, port),
    )
}
