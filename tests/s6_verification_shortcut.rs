//! S6 — the verification shortcut: host plus two externals all approve,
//! Phase 1 and Phase 2 run exactly once, and no debate artifacts are ever
//! written because the shortcut never persists to the store at all.

mod support;

use conclave::{Analysis, ConsensusStatus, DebateOptions, Orchestrator};
use std::sync::Arc;
use support::ScriptedParticipant;

#[tokio::test]
async fn unanimous_approval_is_full_consensus_with_no_debate_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let options = DebateOptions::default();
    let mut orchestrator = Orchestrator::new(dir.path(), options);

    orchestrator.set_host_analysis(Analysis {
        participant_name: conclave::HOST_PARTICIPANT_NAME.to_string(),
        participant_version: None,
        analysis_text: Some("The host reviewed the diff and concludes: APPROVE. Padded past the fifty character minimum.".to_string()),
        conclusion: Some("APPROVE".to_string()),
        confidence: Some(0.95),
        key_points: vec![],
        placeholder_flag: None,
        extra: serde_json::Map::new(),
    });
    orchestrator.register_participant("reviewer_a", Arc::new(ScriptedParticipant::new("reviewer_a", "APPROVE"))).unwrap();
    orchestrator.register_participant("reviewer_b", Arc::new(ScriptedParticipant::new("reviewer_b", "APPROVE"))).unwrap();

    let result = orchestrator.run_verification("Is this implementation acceptable?").await;

    assert_eq!(result.consensus.status, ConsensusStatus::FullConsensus);
    assert_eq!(result.analyses_by_name.len(), 3);

    assert!(!dir.path().exists() || dir.path().read_dir().unwrap().next().is_none(), "shortcut must not persist any task directory");
}
