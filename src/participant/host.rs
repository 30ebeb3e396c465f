//! The host analyst (§4.5, §9): an in-process producer whose
//! contributions are injected by the caller before `run()`, never a
//! subtype of `Participant` with a null transport. This keeps the
//! impersonation hazard the reserved name guards against structural
//! rather than a convention that could be bypassed.

use crate::model::{Analysis, DebateOutcome, Review};
use std::collections::HashMap;

use super::HOST_PARTICIPANT_NAME;

/// Three injectable slots: analysis, one review per reviewed participant,
/// and a debate outcome. An empty slot is treated as an absent
/// contribution for that phase.
#[derive(Default)]
pub struct HostAnalyst {
    analysis: Option<Analysis>,
    reviews: HashMap<String, Review>,
    debate: Option<DebateOutcome>,
}

impl HostAnalyst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_analysis(&mut self, analysis: Analysis) {
        self.analysis = Some(analysis);
    }

    pub fn set_review(&mut self, for_reviewed: impl Into<String>, review: Review) {
        self.reviews.insert(for_reviewed.into(), review);
    }

    pub fn set_debate(&mut self, outcome: DebateOutcome) {
        self.debate = Some(outcome);
    }

    /// Take this round's analysis, or a placeholder (always rejected by
    /// the integrity validator) if the slot was never set.
    pub fn take_analysis(&mut self) -> Analysis {
        self.analysis
            .take()
            .unwrap_or_else(|| Analysis::placeholder(HOST_PARTICIPANT_NAME))
    }

    /// Take the review the host prepared for `reviewed`, if any. An
    /// unset slot excludes the host from that pairing without aborting
    /// the round.
    pub fn take_review(&mut self, reviewed: &str) -> Option<Review> {
        self.reviews.remove(reviewed)
    }

    /// Take the debate outcome prepared this round, if any.
    pub fn take_debate(&mut self) -> Option<DebateOutcome> {
        self.debate.take()
    }
}
