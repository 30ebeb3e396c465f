//! Shared fixtures for the end-to-end deliberation scenarios (S1-S8).
//!
//! Mirrors the `MockProvider`-style fixtures under
//! `brain/agent/service/tests/mod.rs`: one scripted participant type,
//! configured per-test rather than one bespoke struct per scenario.

use async_trait::async_trait;
use conclave::{Analysis, DebateOutcome, Participant, Review, UpdatedPosition};
use std::time::Duration;

/// Installs a `tracing` subscriber scoped to the test harness's writer, so
/// `RUST_LOG=debug cargo test -- --nocapture` surfaces orchestrator logging
/// around the timing-sensitive scenarios. Safe to call from every test in
/// the same binary; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).try_init();
}

/// A participant whose responses are fixed at construction time. `analyze`
/// can be made to fail by setting `fails_with`; `debate` can be scripted
/// with an explicit outcome, otherwise it concedes to the first opposing
/// conclusion that differs from its own.
pub struct ScriptedParticipant {
    pub name: String,
    pub conclusion: String,
    pub confidence: f64,
    pub version: Option<String>,
    pub fails_with: Option<String>,
    pub debate_outcome: Option<DebateOutcome>,
}

impl ScriptedParticipant {
    pub fn new(name: &str, conclusion: &str) -> Self {
        Self {
            name: name.to_string(),
            conclusion: conclusion.to_string(),
            confidence: 0.9,
            version: None,
            fails_with: None,
            debate_outcome: None,
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            fails_with: Some(message.to_string()),
            ..Self::new(name, "")
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }
}

#[async_trait]
impl Participant for ScriptedParticipant {
    async fn preflight(&self) -> Result<(), String> {
        Ok(())
    }

    async fn analyze(&self, _task: &str, _prior_context: Option<&str>) -> Result<Analysis, String> {
        if let Some(message) = &self.fails_with {
            return Err(message.clone());
        }
        Ok(Analysis {
            participant_name: self.name.clone(),
            participant_version: self.version.clone(),
            analysis_text: Some(format!(
                "{} independently analyzed the task and concluded: {}. This text is padded well past the fifty character minimum.",
                self.name, self.conclusion
            )),
            conclusion: Some(self.conclusion.clone()),
            confidence: Some(self.confidence),
            key_points: vec![format!("supports {}", self.conclusion)],
            placeholder_flag: None,
            extra: serde_json::Map::new(),
        })
    }

    async fn review(&self, _task: &str, peer_analysis: &Analysis, own_analysis: &Analysis) -> Result<Review, String> {
        let agree = peer_analysis.conclusion == own_analysis.conclusion;
        Ok(Review {
            reviewer_name: own_analysis.participant_name.clone(),
            reviewed_name: peer_analysis.participant_name.clone(),
            feedback: if agree {
                "I reach the same conclusion.".to_string()
            } else {
                "I reach a different conclusion.".to_string()
            },
            agreement_points: if agree { vec!["same conclusion".to_string()] } else { vec![] },
            disagreement_points: if agree { vec![] } else { vec!["different conclusion".to_string()] },
            suggested_improvements: vec![],
        })
    }

    async fn debate(&self, _task: &str, own_position: &Analysis, opposing_views: &[Analysis]) -> Result<DebateOutcome, String> {
        if let Some(outcome) = &self.debate_outcome {
            return Ok(outcome.clone());
        }

        let own_conclusion = own_position.conclusion.clone().unwrap_or_default();
        Ok(DebateOutcome {
            updated_position: UpdatedPosition::Structured {
                conclusion: own_conclusion.clone(),
                confidence: own_position.confidence,
                key_points: own_position.key_points.clone(),
            },
            rebuttals: opposing_views.iter().map(|o| format!("unconvinced by {}", o.participant_name)).collect(),
            concessions: vec![],
            remaining_disagreements: opposing_views
                .iter()
                .filter(|o| o.conclusion != own_position.conclusion)
                .map(|o| o.conclusion.clone().unwrap_or_default())
                .collect(),
        })
    }
}

/// A participant whose `preflight()` sleeps past a caller-configured delay
/// before succeeding. Used to exercise preflight-timeout pruning; it must
/// never reach `analyze`/`review`/`debate` once excluded.
pub struct SlowPreflightParticipant {
    pub name: String,
    pub delay: Duration,
}

impl SlowPreflightParticipant {
    pub fn new(name: &str, delay: Duration) -> Self {
        Self { name: name.to_string(), delay }
    }
}

#[async_trait]
impl Participant for SlowPreflightParticipant {
    async fn preflight(&self) -> Result<(), String> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn analyze(&self, _task: &str, _prior_context: Option<&str>) -> Result<Analysis, String> {
        unreachable!("{} was pruned at preflight and must never analyze", self.name)
    }

    async fn review(&self, _task: &str, _peer_analysis: &Analysis, _own_analysis: &Analysis) -> Result<Review, String> {
        unreachable!("{} was pruned at preflight and must never review", self.name)
    }

    async fn debate(&self, _task: &str, _own_position: &Analysis, _opposing_views: &[Analysis]) -> Result<DebateOutcome, String> {
        unreachable!("{} was pruned at preflight and must never debate", self.name)
    }
}

/// A participant whose `analyze()` sleeps past a caller-configured delay
/// before resolving, used to give a cancellation a window to land mid-flight.
pub struct SleepyParticipant {
    pub name: String,
    pub conclusion: String,
    pub analyze_delay: Duration,
}

impl SleepyParticipant {
    pub fn new(name: &str, conclusion: &str, analyze_delay: Duration) -> Self {
        Self { name: name.to_string(), conclusion: conclusion.to_string(), analyze_delay }
    }
}

#[async_trait]
impl Participant for SleepyParticipant {
    async fn preflight(&self) -> Result<(), String> {
        Ok(())
    }

    async fn analyze(&self, _task: &str, _prior_context: Option<&str>) -> Result<Analysis, String> {
        tokio::time::sleep(self.analyze_delay).await;
        Ok(Analysis {
            participant_name: self.name.clone(),
            participant_version: None,
            analysis_text: Some(format!("{} eventually concluded: {}, padded past the fifty character minimum.", self.name, self.conclusion)),
            conclusion: Some(self.conclusion.clone()),
            confidence: Some(0.9),
            key_points: vec![],
            placeholder_flag: None,
            extra: serde_json::Map::new(),
        })
    }

    async fn review(&self, _task: &str, _peer_analysis: &Analysis, _own_analysis: &Analysis) -> Result<Review, String> {
        unreachable!("cancellation test never lets this participant reach review")
    }

    async fn debate(&self, _task: &str, _own_position: &Analysis, _opposing_views: &[Analysis]) -> Result<DebateOutcome, String> {
        unreachable!("cancellation test never lets this participant reach debate")
    }
}
