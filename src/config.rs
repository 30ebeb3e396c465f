//! Run configuration.
//!
//! Mirrors `config::types::Config`'s struct-of-defaults style without the
//! file-loading/env-var machinery that module also carries — the core never
//! reads a config file itself, callers construct [`DebateOptions`] directly
//! (the CLI/argument-parsing shell that would populate one is out of scope).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options accepted by [`crate::orchestrator::Orchestrator::run`] and
/// `run_verification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateOptions {
    /// Maximum number of rounds before forcing a final dossier.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Consensus percentage at or above which the protocol returns
    /// `FULL_CONSENSUS`. Must lie in `[0.5, 1.0]`.
    #[serde(default = "default_consensus_threshold")]
    pub consensus_threshold: f64,

    /// Whether the host analyst participates alongside external analysts.
    #[serde(default = "default_include_host")]
    pub include_host: bool,

    /// If true, `run()` fails with `NoAvailableParticipants` when no
    /// external participant survives preflight (even if the host is
    /// included).
    #[serde(default)]
    pub strict: bool,

    /// Similarity threshold passed to the semantic comparator when
    /// clustering conclusions. Distinct from `consensus_threshold`.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Per-operation deadline for `analyze`/`review`/`debate` calls.
    /// Implementation-defined per the specification; fixed here at 120s.
    #[serde(default = "default_operation_timeout", with = "duration_secs")]
    pub operation_timeout: Duration,

    /// Fixed ceiling for `preflight()` calls. The specification pins this
    /// at 30s; exposed here only so tests can shrink it.
    #[serde(default = "default_preflight_timeout", with = "duration_secs")]
    pub preflight_timeout: Duration,
}

fn default_max_rounds() -> usize {
    5
}

fn default_consensus_threshold() -> f64 {
    0.8
}

fn default_include_host() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    0.3
}

fn default_operation_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_preflight_timeout() -> Duration {
    Duration::from_secs(30)
}

/// `Duration` as a whole number of seconds on the wire, since `std::time::Duration`
/// has no `Serialize`/`Deserialize` impl of its own.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

impl Default for DebateOptions {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            consensus_threshold: default_consensus_threshold(),
            include_host: default_include_host(),
            strict: false,
            similarity_threshold: default_similarity_threshold(),
            operation_timeout: default_operation_timeout(),
            preflight_timeout: default_preflight_timeout(),
        }
    }
}

impl DebateOptions {
    /// Clamp `consensus_threshold` into the specification's documented
    /// `[0.5, 1.0]` range.
    pub fn normalized(mut self) -> Self {
        self.consensus_threshold = self.consensus_threshold.clamp(0.5, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let options = DebateOptions::default();
        assert_eq!(options.max_rounds, 5);
        assert_eq!(options.consensus_threshold, 0.8);
        assert!(options.include_host);
        assert!(!options.strict);
        assert_eq!(options.similarity_threshold, 0.3);
        assert_eq!(options.operation_timeout, Duration::from_secs(120));
        assert_eq!(options.preflight_timeout, Duration::from_secs(30));
    }

    #[test]
    fn deserializes_partial_json_with_field_defaults() {
        let options: DebateOptions = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert!(options.strict);
        assert_eq!(options.max_rounds, 5);
        assert_eq!(options.preflight_timeout, Duration::from_secs(30));
    }

    #[test]
    fn round_trips_through_json() {
        let options = DebateOptions::default();
        let json = serde_json::to_string(&options).unwrap();
        let parsed: DebateOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn normalized_clamps_consensus_threshold() {
        let options = DebateOptions { consensus_threshold: 0.3, ..DebateOptions::default() }.normalized();
        assert_eq!(options.consensus_threshold, 0.5);
        let options = DebateOptions { consensus_threshold: 1.5, ..DebateOptions::default() }.normalized();
        assert_eq!(options.consensus_threshold, 1.0);
    }
}
