//! Conclave — multi-agent consensus debate core.
//!
//! Several independent analyst agents produce structured analyses over a
//! task description in parallel; a semantic consensus protocol compares
//! their conclusions; when agreement falls short of quorum, cross-review
//! and debate rounds run until either a quorum is reached or the round
//! budget is exhausted. Every phase artifact is persisted to a chunked,
//! human-readable Markdown store, and the deliberation closes with a
//! terminal dossier.
//!
//! Provider implementations (the concrete HTTP/SSE clients behind each
//! analyst) are the caller's concern — this crate only defines the
//! [`Participant`] capability contract and the orchestration around it.

pub mod comparator;
pub mod config;
pub mod consensus;
pub mod convergence;
pub mod dossier;
pub mod error;
pub mod integrity;
pub mod model;
pub mod orchestrator;
pub mod participant;
pub mod store;
pub mod strategy;
pub mod verification;

pub use config::DebateOptions;
pub use dossier::{DossierStatus, FinalDossier, FinalStrategy};
pub use error::{DebateError, Result};
pub use model::{
    Analysis, ClusterSummary, ConsensusResult, ConsensusStatus, DebateOutcome, NextAction, Review, RoundRecord, TaskId,
    UpdatedPosition,
};
pub use orchestrator::Orchestrator;
pub use participant::{HostAnalyst, Participant, RegistrationError, Registry, HOST_PARTICIPANT_NAME};
pub use verification::VerificationResult;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
