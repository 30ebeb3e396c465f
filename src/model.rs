//! Core data model shared by every component: [`Analysis`], [`Review`],
//! [`DebateOutcome`], [`ConsensusResult`] and the round/task bookkeeping
//! types that wrap them.
//!
//! All wire-shaped types derive `Serialize`/`Deserialize` with
//! `camelCase` fields, matching `a2a::types` and `a2a::debate` in the
//! teacher corpus.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Opaque task identifier: a UTC-millisecond timestamp plus a short random
/// suffix, per the specification's "time + random suffix" wording.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{millis}-{}", &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One participant's contribution for one round.
///
/// Structurally all of `analysis_text`/`conclusion`/`confidence` are
/// optional so the integrity validator (`crate::integrity`) can detect
/// absence rather than relying on the caller to pre-filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub participant_name: String,

    /// The verbatim model identifier reported by the provider, preserved
    /// unmodified wherever this `Analysis` is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_flag: Option<bool>,

    /// Forward-compatibility bag for provider-specific extras (e.g.
    /// `reasoning_summary`) that the core never interprets.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Analysis {
    /// A placeholder analysis for an empty host-injection slot. Always
    /// rejected by the integrity validator.
    pub fn placeholder(participant_name: impl Into<String>) -> Self {
        Self {
            participant_name: participant_name.into(),
            participant_version: None,
            analysis_text: None,
            conclusion: None,
            confidence: None,
            key_points: Vec::new(),
            placeholder_flag: Some(true),
            extra: serde_json::Map::new(),
        }
    }
}

/// `{feedback, agreement_points[], disagreement_points[], suggested_improvements[]}`
/// returned by a participant's `review` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub reviewer_name: String,
    pub reviewed_name: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agreement_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disagreement_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_improvements: Vec<String>,
}

/// The updated position a participant argues after a debate round.
///
/// `updated_position` may be returned either as a structured object or as
/// a flat string (back-compat); either shape deserializes into this
/// untagged enum, with the flat-string case treated as a `conclusion`
/// assignment only (per §9 Open Questions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdatedPosition {
    Structured {
        conclusion: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confidence: Option<f64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        key_points: Vec<String>,
    },
    Flat(String),
}

impl UpdatedPosition {
    /// The conclusion text, regardless of which shape was returned.
    pub fn conclusion(&self) -> &str {
        match self {
            Self::Structured { conclusion, .. } => conclusion,
            Self::Flat(s) => s,
        }
    }
}

/// `{updated_position, rebuttals[], concessions[], remaining_disagreements[]}`
/// returned by a participant's `debate` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateOutcome {
    pub updated_position: UpdatedPosition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rebuttals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concessions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remaining_disagreements: Vec<String>,
}

/// Consensus status, per the decision table in the consensus protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsensusStatus {
    FullConsensus,
    PartialConsensus,
    NoConsensus,
}

/// What the orchestrator should do next after a consensus evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextAction {
    CrossReview,
    Debate,
    NeedMoreAnalyses,
}

/// A cluster of conclusions judged semantically equivalent by the
/// comparator: a representative text, the participants who landed in it,
/// and its size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub representative_conclusion: String,
    pub participant_names: Vec<String>,
    pub size: usize,
}

/// The consensus protocol's judgement over one snapshot of analyses (or
/// reviews, for the cross-review variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    pub status: ConsensusStatus,
    pub consensus_percentage: f64,
    pub agreed_items: Vec<ClusterSummary>,
    pub disputed_items: Vec<ClusterSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<NextAction>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl ConsensusResult {
    pub(crate) fn detail(key: &str, value: impl Into<serde_json::Value>) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), value.into());
        map
    }
}

/// Artifacts produced during one round.
#[derive(Debug, Clone, Default)]
pub struct RoundRecord {
    pub round_index: usize,
    pub analyses: HashMap<String, Analysis>,
    pub reviews: HashMap<(String, String), Review>,
    pub debates: HashMap<String, DebateOutcome>,
    pub consensus: Option<ConsensusResult>,
}

impl RoundRecord {
    pub fn new(round_index: usize) -> Self {
        Self {
            round_index,
            ..Default::default()
        }
    }
}
