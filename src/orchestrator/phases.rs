//! The five-phase round body (§4.7) plus preflight pruning.
//!
//! Fan-out is `tokio::spawn` + collected `JoinHandle`s, the same shape as
//! `a2a::debate::run_debate`'s bee fan-out. Cancellation races the
//! barrier itself: on cancel, every outstanding task is aborted and the
//! barrier returns [`DebateError::Cancelled`] instead of partial results.

use crate::error::DebateError;
use crate::integrity;
use crate::model::{Analysis, DebateOutcome, Review};
use crate::participant::{HostAnalyst, Participant, Registry};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::warn;

type Result<T> = std::result::Result<T, DebateError>;

/// Race a batch of spawned tasks against cancellation. On cancel, abort
/// every outstanding task and return `Err(Cancelled)`.
pub(super) async fn join_cancellable<T: Send + 'static>(
    handles: Vec<JoinHandle<T>>,
    token: Option<&CancellationToken>,
) -> Result<Vec<std::result::Result<T, JoinError>>> {
    let Some(token) = token else {
        return Ok(futures::future::join_all(handles).await);
    };

    let abort_handles: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
    tokio::select! {
        _ = token.cancelled() => {
            for handle in abort_handles {
                handle.abort();
            }
            Err(DebateError::Cancelled)
        }
        results = futures::future::join_all(handles) => Ok(results),
    }
}

/// Preflight every registered participant concurrently, bounded by
/// `timeout`. Returns the names that failed (raised or timed out) so the
/// caller can prune them from the live registry (testable property 7).
pub(super) async fn preflight_all(registry: &Registry, timeout: Duration, token: Option<&CancellationToken>) -> Result<HashMap<String, String>> {
    let mut handles = Vec::new();
    for (name, participant) in registry.iter() {
        let name = name.to_string();
        let participant = Arc::clone(participant);
        handles.push(tokio::spawn(async move {
            let outcome = tokio::time::timeout(timeout, participant.preflight()).await;
            (name, outcome)
        }));
    }

    let mut failed = HashMap::new();
    for joined in join_cancellable(handles, token).await? {
        match joined {
            Ok((_name, Ok(Ok(())))) => {}
            Ok((name, Ok(Err(message)))) => {
                failed.insert(
                    name.clone(),
                    DebateError::ParticipantOperationFailure { participant: name, operation: "preflight", reason: message }.to_string(),
                );
            }
            Ok((name, Err(_elapsed))) => {
                failed.insert(
                    name.clone(),
                    DebateError::ParticipantOperationFailure {
                        participant: name,
                        operation: "preflight",
                        reason: "exceeded 30s".to_string(),
                    }
                    .to_string(),
                );
            }
            Err(join_error) => {
                warn!(%join_error, "preflight task panicked");
            }
        }
    }
    Ok(failed)
}

/// Phase 1: fan out `analyze` to every live participant plus (optionally)
/// the host's injected slot. Invalid analyses are rejected and recorded,
/// never entering the returned map (testable property 4).
pub(super) async fn analyze_round(
    registry: &Registry,
    host: Option<&mut HostAnalyst>,
    include_host: bool,
    task: &str,
    prior_context: Option<&str>,
    timeout: Duration,
    token: Option<&CancellationToken>,
) -> Result<(HashMap<String, Analysis>, HashMap<String, String>)> {
    let mut valid = HashMap::new();
    let mut failed = HashMap::new();

    if include_host
        && let Some(host) = host
    {
        let candidate = host.take_analysis();
        match integrity::validate(&candidate) {
            Ok(()) => {
                valid.insert(candidate.participant_name.clone(), candidate);
            }
            Err(reason) => {
                failed.insert(
                    crate::participant::HOST_PARTICIPANT_NAME.to_string(),
                    DebateError::IntegrityRejection {
                        participant: crate::participant::HOST_PARTICIPANT_NAME.to_string(),
                        reason,
                    }
                    .to_string(),
                );
            }
        }
    }

    let mut handles = Vec::new();
    for (name, participant) in registry.iter() {
        let name = name.to_string();
        let participant: Arc<dyn Participant> = Arc::clone(participant);
        let task = task.to_string();
        let prior_context = prior_context.map(str::to_string);
        handles.push(tokio::spawn(async move {
            let outcome = tokio::time::timeout(timeout, participant.analyze(&task, prior_context.as_deref())).await;
            (name, outcome)
        }));
    }

    for joined in join_cancellable(handles, token).await? {
        match joined {
            Ok((name, Ok(Ok(candidate)))) => match integrity::validate(&candidate) {
                Ok(()) => {
                    valid.insert(name, candidate);
                }
                Err(reason) => {
                    failed.insert(
                        name.clone(),
                        DebateError::IntegrityRejection { participant: name, reason }.to_string(),
                    );
                }
            },
            Ok((name, Ok(Err(message)))) => {
                failed.insert(
                    name.clone(),
                    DebateError::ParticipantOperationFailure { participant: name, operation: "analyze", reason: message }.to_string(),
                );
            }
            Ok((name, Err(_elapsed))) => {
                failed.insert(
                    name.clone(),
                    DebateError::ParticipantOperationFailure {
                        participant: name,
                        operation: "analyze",
                        reason: "exceeded operation timeout".to_string(),
                    }
                    .to_string(),
                );
            }
            Err(join_error) => {
                warn!(%join_error, "analyze task panicked");
            }
        }
    }

    Ok((valid, failed))
}

/// Phase 3: fan out `review` over every ordered pair `(reviewer, reviewed)`
/// drawn from *this round's* surviving participants — not the global
/// registry, so preflight-failed participants never spawn phantom reviews.
pub(super) async fn review_round(
    registry: &Registry,
    host: Option<&mut HostAnalyst>,
    include_host: bool,
    task: &str,
    current_analyses: &HashMap<String, Analysis>,
    timeout: Duration,
    token: Option<&CancellationToken>,
) -> Result<(Vec<Review>, HashMap<String, String>)> {
    let mut names: Vec<String> = current_analyses.keys().cloned().collect();
    names.sort();

    let mut reviews = Vec::new();
    if let Some(host) = host.filter(|_| include_host) {
        for reviewed in &names {
            if reviewed == crate::participant::HOST_PARTICIPANT_NAME {
                continue;
            }
            if let Some(review) = host.take_review(reviewed) {
                reviews.push(review);
            }
        }
    }

    let by_name: HashMap<&str, &Arc<dyn Participant>> = registry.iter().map(|(n, p)| (n, p)).collect();

    let mut handles = Vec::new();
    for reviewer in &names {
        let Some(participant) = by_name.get(reviewer.as_str()) else {
            continue;
        };
        let Some(own_analysis) = current_analyses.get(reviewer) else {
            continue;
        };
        for reviewed in &names {
            if reviewed == reviewer {
                continue;
            }
            let Some(peer_analysis) = current_analyses.get(reviewed) else {
                continue;
            };
            let participant = Arc::clone(participant);
            let task = task.to_string();
            let own_analysis = own_analysis.clone();
            let peer_analysis = peer_analysis.clone();
            let reviewer = reviewer.clone();
            let reviewed = reviewed.clone();
            handles.push(tokio::spawn(async move {
                let outcome = tokio::time::timeout(timeout, participant.review(&task, &peer_analysis, &own_analysis)).await;
                (reviewer, reviewed, outcome)
            }));
        }
    }

    let mut failed = HashMap::new();
    for joined in join_cancellable(handles, token).await? {
        match joined {
            Ok((_, _, Ok(Ok(review)))) => reviews.push(review),
            Ok((reviewer, reviewed, Ok(Err(message)))) => {
                let key = format!("{reviewer}->{reviewed}");
                failed.insert(
                    key,
                    DebateError::ParticipantOperationFailure { participant: reviewer, operation: "review", reason: message }.to_string(),
                );
            }
            Ok((reviewer, reviewed, Err(_elapsed))) => {
                let key = format!("{reviewer}->{reviewed}");
                failed.insert(
                    key,
                    DebateError::ParticipantOperationFailure {
                        participant: reviewer,
                        operation: "review",
                        reason: "exceeded operation timeout".to_string(),
                    }
                    .to_string(),
                );
            }
            Err(join_error) => {
                warn!(%join_error, "review task panicked");
            }
        }
    }

    Ok((reviews, failed))
}

/// Phase 4: fan out `debate` to every current-round participant, each
/// given its own position plus every other surviving participant's
/// analysis as the opposing views.
pub(super) async fn debate_round(
    registry: &Registry,
    host: Option<&mut HostAnalyst>,
    include_host: bool,
    task: &str,
    current_analyses: &HashMap<String, Analysis>,
    timeout: Duration,
    token: Option<&CancellationToken>,
) -> Result<(HashMap<String, DebateOutcome>, HashMap<String, String>)> {
    let mut outcomes = HashMap::new();

    if include_host
        && let Some(host) = host
        && let Some(outcome) = host.take_debate()
    {
        outcomes.insert(crate::participant::HOST_PARTICIPANT_NAME.to_string(), outcome);
    }

    let by_name: HashMap<&str, &Arc<dyn Participant>> = registry.iter().map(|(n, p)| (n, p)).collect();

    let mut handles = Vec::new();
    for (name, own_analysis) in current_analyses {
        let Some(participant) = by_name.get(name.as_str()) else {
            continue;
        };
        let opposing: Vec<Analysis> = current_analyses
            .iter()
            .filter(|(other, _)| *other != name)
            .map(|(_, analysis)| analysis.clone())
            .collect();
        let participant = Arc::clone(participant);
        let task = task.to_string();
        let own_analysis = own_analysis.clone();
        let name = name.clone();
        handles.push(tokio::spawn(async move {
            let outcome = tokio::time::timeout(timeout, participant.debate(&task, &own_analysis, &opposing)).await;
            (name, outcome)
        }));
    }

    let mut failed = HashMap::new();
    for joined in join_cancellable(handles, token).await? {
        match joined {
            Ok((name, Ok(Ok(outcome)))) => {
                outcomes.insert(name, outcome);
            }
            Ok((name, Ok(Err(message)))) => {
                failed.insert(
                    name.clone(),
                    DebateError::ParticipantOperationFailure { participant: name, operation: "debate", reason: message }.to_string(),
                );
            }
            Ok((name, Err(_elapsed))) => {
                failed.insert(
                    name.clone(),
                    DebateError::ParticipantOperationFailure {
                        participant: name,
                        operation: "debate",
                        reason: "exceeded operation timeout".to_string(),
                    }
                    .to_string(),
                );
            }
            Err(join_error) => {
                warn!(%join_error, "debate task panicked");
            }
        }
    }

    Ok((outcomes, failed))
}
