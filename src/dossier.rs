//! Final Dossier Assembler (C9): turns the last [`ConsensusResult`] of a
//! deliberation into the terminal artifact returned to the caller and
//! written as `FINAL.md`.

use crate::model::{ClusterSummary, ConsensusResult, ConsensusStatus, TaskId};
use serde::{Deserialize, Serialize};

/// Mirrors [`ConsensusStatus`] plus a `Failed` case for the degenerate
/// early exit (no consensus result ever computed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DossierStatus {
    FullConsensus,
    PartialConsensus,
    NoConsensus,
    Failed,
}

impl From<ConsensusStatus> for DossierStatus {
    fn from(status: ConsensusStatus) -> Self {
        match status {
            ConsensusStatus::FullConsensus => Self::FullConsensus,
            ConsensusStatus::PartialConsensus => Self::PartialConsensus,
            ConsensusStatus::NoConsensus => Self::NoConsensus,
        }
    }
}

/// Built from the first entry of `agreed_items`: its conclusion text, its
/// supporting participant names, and the round's `consensus_percentage`
/// taken as a confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalStrategy {
    pub conclusion: String,
    pub supporting_participants: Vec<String>,
    pub confidence: f64,
}

/// The terminal artifact of a deliberation (§4.9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDossier {
    pub task_id: TaskId,
    pub status: DossierStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_strategy: Option<FinalStrategy>,
    pub total_rounds: usize,
    pub agreed_items: Vec<ClusterSummary>,
    pub disputed_items: Vec<ClusterSummary>,
}

/// Assemble a dossier from `consensus`, or a `FAILED` dossier with an
/// empty `final_strategy` if no consensus result was ever computed
/// (degenerate early exit, e.g. `NoAvailableParticipants` before Phase 1).
pub fn assemble(task_id: TaskId, total_rounds: usize, consensus: Option<&ConsensusResult>) -> FinalDossier {
    match consensus {
        None => FinalDossier {
            task_id,
            status: DossierStatus::Failed,
            final_strategy: None,
            total_rounds,
            agreed_items: Vec::new(),
            disputed_items: Vec::new(),
        },
        Some(consensus) => {
            let final_strategy = consensus.agreed_items.first().map(|first| FinalStrategy {
                conclusion: first.representative_conclusion.clone(),
                supporting_participants: first.participant_names.clone(),
                confidence: consensus.consensus_percentage,
            });
            FinalDossier {
                task_id,
                status: consensus.status.into(),
                final_strategy,
                total_rounds,
                agreed_items: consensus.agreed_items.clone(),
                disputed_items: consensus.disputed_items.clone(),
            }
        }
    }
}
