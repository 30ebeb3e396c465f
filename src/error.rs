//! Crate-wide error taxonomy.
//!
//! Only [`DebateError::NoAvailableParticipants`] and [`DebateError::Cancelled`]
//! ever escape [`crate::orchestrator::Orchestrator::run`] as an `Err`; every
//! other variant is recorded as a `Display`-rendered string in the debate
//! state's `failed_participants`/`persistence_errors` bags instead (see
//! `orchestrator::phases` and `orchestrator::note_persistence_failure`).

use crate::integrity::RejectionReason;
use std::path::PathBuf;

/// Crate-local result alias, mirroring the teacher's `Result<T, ProviderError>` re-export shape.
pub type Result<T> = std::result::Result<T, DebateError>;

#[derive(Debug, thiserror::Error)]
pub enum DebateError {
    #[error("no available participants to run the debate")]
    NoAvailableParticipants,

    #[error("participant '{participant}' failed during {operation}: {reason}")]
    ParticipantOperationFailure {
        participant: String,
        operation: &'static str,
        reason: String,
    },

    #[error("analysis from '{participant}' rejected: {reason}")]
    IntegrityRejection {
        participant: String,
        reason: RejectionReason,
    },

    #[error("failed to persist artifact at {}: {source}", path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("debate run was cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("malformed chunked artifact: {0}")]
    MalformedArtifact(String),
}
