//! Verification Shortcut (C10): a reduced workflow for "is this
//! implementation acceptable?" checks. Runs Phase 1 (parallel analysis)
//! and Phase 2 (consensus) exactly once; never invokes `review` or
//! `debate`, and never writes a `round_{NN}/debates/` directory (testable
//! property 10).

use crate::config::DebateOptions;
use crate::integrity;
use crate::model::{Analysis, ConsensusResult};
use crate::participant::{HostAnalyst, Registry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// The result of a verification-shortcut run: the consensus judgement plus
/// every surviving participant's conclusion, keyed by name.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub consensus: ConsensusResult,
    pub analyses_by_name: HashMap<String, String>,
}

/// Run the shortcut over `registry` (plus `host`, if `options.include_host`
/// and a host analysis was injected). No store writes happen here; callers
/// who want a persisted record should use [`crate::orchestrator::Orchestrator`].
pub async fn run_verification(task: &str, registry: &Registry, host: Option<&mut HostAnalyst>, options: &DebateOptions) -> VerificationResult {
    let mut analyses: Vec<Analysis> = Vec::new();

    if options.include_host
        && let Some(host) = host
    {
        let candidate = host.take_analysis();
        match integrity::validate(&candidate) {
            Ok(()) => analyses.push(candidate),
            Err(reason) => warn!(participant = %candidate.participant_name, %reason, "host analysis rejected during verification"),
        }
    }

    let mut handles = Vec::new();
    for (name, participant) in registry.iter() {
        let name = name.to_string();
        let participant: Arc<dyn crate::participant::Participant> = Arc::clone(participant);
        let task = task.to_string();
        let timeout = options.operation_timeout;
        handles.push(tokio::spawn(async move {
            let result = tokio::time::timeout(timeout, participant.analyze(&task, None)).await;
            (name, result)
        }));
    }

    for handle in handles {
        match handle.await {
            Ok((name, Ok(Ok(candidate)))) => match integrity::validate(&candidate) {
                Ok(()) => analyses.push(candidate),
                Err(reason) => warn!(participant = %name, %reason, "analysis rejected during verification"),
            },
            Ok((name, Ok(Err(message)))) => warn!(participant = %name, %message, "analyze failed during verification"),
            Ok((name, Err(_elapsed))) => warn!(participant = %name, "analyze timed out during verification"),
            Err(join_error) => warn!(%join_error, "participant task panicked during verification"),
        }
    }

    let analyses_by_name = analyses
        .iter()
        .map(|a| (a.participant_name.clone(), a.conclusion.clone().unwrap_or_default()))
        .collect();

    let consensus = crate::consensus::evaluate(&analyses, options.consensus_threshold, options.similarity_threshold);

    VerificationResult { consensus, analyses_by_name }
}
