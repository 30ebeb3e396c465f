//! Orchestrator-private state (§3 "Debate State", §5 "Shared state").
//!
//! Owned exclusively by [`super::Orchestrator::run`]; mutated only between
//! phase barriers, never concurrently — no `Mutex`/`RwLock` is needed since
//! the orchestrator is a single coordinating flow of control, not shared
//! across tasks.

use crate::convergence::ConvergenceTracker;
use crate::model::{Analysis, ConsensusResult, RoundRecord, TaskId};
use std::collections::HashMap;

pub(super) struct DebateState {
    pub task_id: TaskId,
    pub round_index: usize,
    pub current_analyses: HashMap<String, Analysis>,
    pub failed_participants: HashMap<String, String>,
    /// Store-write failures for this run, in encounter order. Never fatal:
    /// a failed artifact write is logged and recorded here, but the round
    /// loop keeps advancing (§7 — only `NoAvailableParticipants` and
    /// `Cancelled` ever abort `run()`).
    pub persistence_errors: Vec<String>,
    pub last_consensus: Option<ConsensusResult>,
    pub tracker: ConvergenceTracker,
    /// One [`RoundRecord`] per closed round (§3 "Round Record"), appended
    /// in round order. `analyses` only ever holds validated entries and
    /// `reviews` only ever holds pairs from a round that actually ran
    /// Phase 3, since both are built from the same maps the round loop
    /// already enforces those invariants on.
    pub rounds: Vec<RoundRecord>,
}

impl DebateState {
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            round_index: 0,
            current_analyses: HashMap::new(),
            failed_participants: HashMap::new(),
            persistence_errors: Vec::new(),
            last_consensus: None,
            tracker: ConvergenceTracker::new(),
            rounds: Vec::new(),
        }
    }

    /// Ordered snapshot of this round's valid analyses, in registry
    /// iteration order (tie-breaks are defined on this order, not
    /// completion order).
    pub fn ordered_analyses(&self, order: &[String]) -> Vec<Analysis> {
        order
            .iter()
            .filter_map(|name| self.current_analyses.get(name).cloned())
            .collect()
    }
}
