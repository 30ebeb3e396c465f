//! S1 — three participants agree immediately: FULL_CONSENSUS with no
//! round beyond the first needed.

mod support;

use conclave::{DebateOptions, DossierStatus, Orchestrator};
use std::sync::Arc;
use support::ScriptedParticipant;

#[tokio::test]
async fn three_way_agreement_reaches_full_consensus_without_extra_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let options = DebateOptions { include_host: false, ..DebateOptions::default() };
    let mut orchestrator = Orchestrator::new(dir.path(), options);

    for name in ["alpha", "beta", "gamma"] {
        orchestrator
            .register_participant(name, Arc::new(ScriptedParticipant::new(name, "Use Redis for distributed caching")))
            .unwrap();
    }

    let dossier = orchestrator.run("Which cache should we use?", None).await.unwrap();

    assert_eq!(dossier.status, DossierStatus::FullConsensus);
    assert_eq!(dossier.total_rounds, 0);
    assert!(dossier.final_strategy.is_some());

    let task_dir = dir.path().join(dossier.task_id.as_str());
    assert!(task_dir.join("FINAL.md").exists());
    for name in ["alpha", "beta", "gamma"] {
        assert!(task_dir.join("round_00").join(format!("{name}.md")).exists());
    }
}
