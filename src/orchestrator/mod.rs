//! Debate Orchestrator (C7): drives the round state machine described in
//! §4.7 — fan out analyses, validate, evaluate consensus, and (when
//! agreement is short of quorum) cross-review and debate, repeating until
//! either `FULL_CONSENSUS` or the round budget is exhausted.

mod phases;
mod state;

use crate::config::DebateOptions;
use crate::dossier::{self, FinalDossier};
use crate::error::{DebateError, Result};
use crate::model::{Analysis, ConsensusStatus, NextAction, RoundRecord, TaskId};
use crate::participant::{HostAnalyst, Participant, RegistrationError, Registry};
use crate::store::ContextStore;
use crate::strategy::{self, Strategy, StrategyContext};
use crate::verification::{self, VerificationResult};
use state::DebateState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Coordinates one or many deliberations. Not `Sync`-shared across
/// concurrent `run()` calls; construct one per in-flight debate.
pub struct Orchestrator {
    registry: Registry,
    host: HostAnalyst,
    store: ContextStore,
    options: DebateOptions,
}

impl Orchestrator {
    pub fn new(store_root: impl Into<PathBuf>, options: DebateOptions) -> Self {
        Self {
            registry: Registry::new(),
            host: HostAnalyst::new(),
            store: ContextStore::new(store_root),
            options: options.normalized(),
        }
    }

    pub fn register_participant(&mut self, name: impl Into<String>, participant: Arc<dyn Participant>) -> std::result::Result<(), RegistrationError> {
        self.registry.register(name, participant)
    }

    pub fn unregister_participant(&mut self, name: &str) -> bool {
        self.registry.unregister(name)
    }

    pub fn set_host_analysis(&mut self, analysis: Analysis) {
        self.host.set_analysis(analysis);
    }

    pub fn set_host_review(&mut self, for_reviewed: impl Into<String>, review: crate::model::Review) {
        self.host.set_review(for_reviewed, review);
    }

    pub fn set_host_debate(&mut self, outcome: crate::model::DebateOutcome) {
        self.host.set_debate(outcome);
    }

    /// `run_verification` (§4.10 / §6.3): Phase 1 + Phase 2 once, no
    /// store writes, no review/debate.
    pub async fn run_verification(&mut self, task: &str) -> VerificationResult {
        verification::run_verification(task, &self.registry, Some(&mut self.host), &self.options).await
    }

    /// `run` (§4.7 / §6.3): the full deliberation, returning the terminal
    /// dossier. Only [`DebateError::NoAvailableParticipants`] and
    /// [`DebateError::Cancelled`] ever escape as `Err`.
    pub async fn run(&mut self, task: &str, cancel: Option<CancellationToken>) -> Result<FinalDossier> {
        let token = cancel.as_ref();
        let task_id = TaskId::new();

        let failed_preflight = phases::preflight_all(&self.registry, self.options.preflight_timeout, token).await?;
        for (name, reason) in &failed_preflight {
            info!(participant = %name, %reason, "pruned at preflight");
        }
        let survivors: std::collections::HashSet<String> = self.registry.names().map(str::to_string).filter(|n| !failed_preflight.contains_key(n)).collect();
        self.registry.retain_names(&survivors);

        let has_host_contribution = self.options.include_host;
        if self.registry.is_empty() && (self.options.strict || !has_host_contribution) {
            return Err(DebateError::NoAvailableParticipants);
        }

        let mut state = DebateState::new(task_id.clone());
        state.failed_participants = failed_preflight;
        note_persistence_failure(&mut state, "init_task", self.store.init_task(&task_id, task).await);

        let mut task_description = task.to_string();
        let mut prior_context: Option<String> = None;
        let mut completed_rounds = 0usize;

        loop {
            let (valid, failed) = phases::analyze_round(
                &self.registry,
                Some(&mut self.host),
                self.options.include_host,
                &task_description,
                prior_context.as_deref(),
                self.options.operation_timeout,
                token,
            )
            .await?;

            state.current_analyses = valid;
            state.failed_participants.extend(failed);

            for analysis in state.current_analyses.values() {
                let result = self.store.write_analysis(&state.task_id, state.round_index, analysis).await;
                note_persistence_failure(&mut state, "write_analysis", result);
            }

            let order: Vec<String> = self
                .registry
                .names()
                .map(str::to_string)
                .chain(std::iter::once(crate::participant::HOST_PARTICIPANT_NAME.to_string()).filter(|_| self.options.include_host))
                .collect();
            let ordered = state.ordered_analyses(&order);

            let mut consensus = crate::consensus::evaluate(&ordered, self.options.consensus_threshold, self.options.similarity_threshold);
            let result = self.store.write_consensus(&state.task_id, state.round_index, &consensus).await;
            note_persistence_failure(&mut state, "write_consensus", result);
            state.tracker.record(consensus.consensus_percentage);
            info!(round = state.round_index, percentage = consensus.consensus_percentage, status = ?consensus.status, "consensus evaluated");

            let mut round_reviews: HashMap<(String, String), crate::model::Review> = HashMap::new();
            let mut round_debates: HashMap<String, crate::model::DebateOutcome> = HashMap::new();

            if matches!(consensus.next_action, Some(NextAction::CrossReview)) {
                let (reviews, failed_reviews) = phases::review_round(
                    &self.registry,
                    Some(&mut self.host),
                    self.options.include_host,
                    &task_description,
                    &state.current_analyses,
                    self.options.operation_timeout,
                    token,
                )
                .await?;
                state.failed_participants.extend(failed_reviews);

                for review in &reviews {
                    let result = self.store.write_review(&state.task_id, state.round_index, review).await;
                    note_persistence_failure(&mut state, "write_review", result);
                    round_reviews.insert((review.reviewer_name.clone(), review.reviewed_name.clone()), review.clone());
                }

                consensus = crate::consensus::evaluate_cross_review(&reviews, self.options.consensus_threshold);
                let result = self.store.write_consensus(&state.task_id, state.round_index, &consensus).await;
                note_persistence_failure(&mut state, "write_consensus", result);
            }

            if matches!(consensus.next_action, Some(NextAction::Debate)) {
                let (outcomes, failed_debates) = phases::debate_round(
                    &self.registry,
                    Some(&mut self.host),
                    self.options.include_host,
                    &task_description,
                    &state.current_analyses,
                    self.options.operation_timeout,
                    token,
                )
                .await?;
                state.failed_participants.extend(failed_debates);

                for (name, outcome) in &outcomes {
                    let result = self.store.write_debate(&state.task_id, state.round_index, name, outcome).await;
                    note_persistence_failure(&mut state, "write_debate", result);
                    if let Some(analysis) = state.current_analyses.get_mut(name) {
                        apply_debate_outcome(analysis, outcome);
                    }
                    round_debates.insert(name.clone(), outcome.clone());
                }
            }

            state.last_consensus = Some(consensus.clone());

            let mut round_record = RoundRecord::new(state.round_index);
            round_record.analyses = state.current_analyses.clone();
            round_record.reviews = round_reviews;
            round_record.debates = round_debates;
            round_record.consensus = Some(consensus.clone());
            state.rounds.push(round_record);

            // Matches the specification's "total_rounds counts rounds beyond
            // the first" convention: round 0 completing alone reports 0.
            completed_rounds = state.round_index;

            let full_consensus = matches!(consensus.status, ConsensusStatus::FullConsensus);
            let budget_exhausted = state.round_index + 1 >= self.options.max_rounds;
            if full_consensus || budget_exhausted {
                break;
            }

            let strategy = if consensus.disputed_items.is_empty() { Strategy::Normal } else { Strategy::ScopeReduced };
            let context = StrategyContext {
                task_description: task,
                disputed_items: &consensus.disputed_items,
                participant_names: &order,
            };
            let outcome = strategy::apply(strategy, &context);
            task_description = outcome.task_description;
            // Drawn from this round's (debate-updated) `current_analyses`,
            // not from `consensus` — Phase 1 re-runs from scratch every
            // round, so this is the only channel through which Phase 4's
            // updated positions reach the next round's analyze() calls
            // (spec.md:162). The `consensus` snapshot is stale by this
            // point and, on the CROSS_REVIEW -> DEBATE path, its
            // `agreed_items` is always empty (`evaluate_cross_review` never
            // populates it), so reading it here silently dropped every
            // debate outcome on that path.
            prior_context = build_prior_context(&state.current_analyses, &order);

            state.round_index += 1;
        }

        let dossier = dossier::assemble(state.task_id.clone(), completed_rounds, state.last_consensus.as_ref());
        let final_percentage = state.last_consensus.as_ref().map(|c| c.consensus_percentage).unwrap_or(0.0);
        if let Err(error) = self.store.write_final(&state.task_id, &dossier, final_percentage).await {
            warn!(%error, "writing FINAL.md failed, retrying once");
            let retry = self.store.write_final(&state.task_id, &dossier, final_percentage).await;
            note_persistence_failure(&mut state, "write_final", retry);
        }

        // `dossier` already carries the terminal result in full regardless
        // of whether FINAL.md made it to disk — a persistence failure here
        // is recorded in `state.persistence_errors`, never substituted with
        // a partial/placeholder artifact.
        if !state.persistence_errors.is_empty() {
            warn!(count = state.persistence_errors.len(), errors = ?state.persistence_errors, "run completed with non-fatal persistence failures");
        }
        Ok(dossier)
    }
}

/// Log and record a non-fatal store-write failure without aborting the
/// round loop (§7: only `NoAvailableParticipants`/`Cancelled` escape `run()`).
fn note_persistence_failure(state: &mut DebateState, operation: &'static str, result: Result<()>) {
    if let Err(error) = result {
        warn!(%operation, %error, "persistence failed, continuing without this artifact");
        state.persistence_errors.push(format!("{operation}: {error}"));
    }
}

/// The context handed to the next round's `analyze()` calls: each current
/// participant's name and conclusion, in registry order, joined one per
/// line. `None` when no participant holds a conclusion yet (e.g. every
/// analysis was rejected this round).
fn build_prior_context(analyses: &HashMap<String, Analysis>, order: &[String]) -> Option<String> {
    let lines: Vec<String> = order
        .iter()
        .filter_map(|name| analyses.get(name))
        .filter_map(|analysis| analysis.conclusion.as_deref().map(|conclusion| format!("{}: {}", analysis.participant_name, conclusion)))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn apply_debate_outcome(analysis: &mut Analysis, outcome: &crate::model::DebateOutcome) {
    match &outcome.updated_position {
        crate::model::UpdatedPosition::Structured { conclusion, confidence, key_points } => {
            analysis.conclusion = Some(conclusion.clone());
            if confidence.is_some() {
                analysis.confidence = *confidence;
            }
            if !key_points.is_empty() {
                analysis.key_points = key_points.clone();
            }
        }
        crate::model::UpdatedPosition::Flat(text) => {
            analysis.conclusion = Some(text.clone());
        }
    }
}
