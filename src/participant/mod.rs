//! Participant Registry (C5): the capability contract external analysts
//! implement, plus the registry that tracks them and the distinct
//! host-analyst producer.

mod host;
mod registry;

pub use host::HostAnalyst;
pub use registry::{Registry, RegistrationError};

use crate::model::{Analysis, DebateOutcome, Review};
use async_trait::async_trait;

/// The reserved name used by the host analyst. Registering an external
/// participant under this name fails before any network I/O.
pub const HOST_PARTICIPANT_NAME: &str = "host";

/// The capability contract exposed by an external analyst (§6.1).
///
/// All four operations are asynchronous; errors propagate as a plain
/// message the orchestrator records but never interprets.
#[async_trait]
pub trait Participant: Send + Sync {
    /// Idempotent reachability/credential check, bounded by the caller at
    /// up to 30 seconds (enforced by the orchestrator, not this trait).
    async fn preflight(&self) -> Result<(), String>;

    /// Produce an analysis for `task`, optionally informed by
    /// `prior_context` (a summary of a previous round).
    async fn analyze(&self, task: &str, prior_context: Option<&str>) -> Result<Analysis, String>;

    /// Review a peer's analysis alongside this participant's own.
    async fn review(&self, task: &str, peer_analysis: &Analysis, own_analysis: &Analysis) -> Result<Review, String>;

    /// Argue an updated position given the opposing views collected this round.
    async fn debate(&self, task: &str, own_position: &Analysis, opposing_views: &[Analysis]) -> Result<DebateOutcome, String>;
}
