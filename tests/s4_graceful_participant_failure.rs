//! S4 — one external participant fails during analysis. The run neither
//! crashes nor stalls: the failure is recorded, and the surviving
//! participants still produce a dossier.

mod support;

use conclave::{DebateOptions, Orchestrator};
use std::sync::Arc;
use support::ScriptedParticipant;

#[tokio::test]
async fn failing_participant_is_excluded_without_aborting_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let options = DebateOptions { include_host: false, max_rounds: 1, strict: false, ..DebateOptions::default() };
    let mut orchestrator = Orchestrator::new(dir.path(), options);

    orchestrator.register_participant("reliable", Arc::new(ScriptedParticipant::new("reliable", "Ship it"))).unwrap();
    orchestrator
        .register_participant("flaky", Arc::new(ScriptedParticipant::failing("flaky", "upstream connection refused")))
        .unwrap();

    let dossier = orchestrator.run("Should we ship the release?", None).await.unwrap();

    let round_dir = dir.path().join(dossier.task_id.as_str()).join("round_00");
    assert!(round_dir.join("reliable.md").exists());
    assert!(!round_dir.join("flaky.md").exists());
}
