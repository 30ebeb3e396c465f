//! S3 — three externals, three distinct conclusions: no majority forms at
//! Phase 2, cross-review finds no agreement either, and the deliberation
//! falls through to debate with every participant's outcome recorded.

mod support;

use conclave::{DebateOptions, Orchestrator};
use std::sync::Arc;
use support::ScriptedParticipant;

#[tokio::test]
async fn three_way_split_reaches_debate_for_every_participant() {
    let dir = tempfile::tempdir().unwrap();
    let options = DebateOptions { include_host: false, max_rounds: 1, ..DebateOptions::default() };
    let mut orchestrator = Orchestrator::new(dir.path(), options);

    orchestrator.register_participant("rustacean", Arc::new(ScriptedParticipant::new("rustacean", "Rust"))).unwrap();
    orchestrator.register_participant("gopher", Arc::new(ScriptedParticipant::new("gopher", "Go"))).unwrap();
    orchestrator.register_participant("pythonista", Arc::new(ScriptedParticipant::new("pythonista", "Python"))).unwrap();

    let dossier = orchestrator.run("Which language should the new service use?", None).await.unwrap();

    assert_eq!(dossier.total_rounds, 0);
    assert_ne!(dossier.status, conclave::DossierStatus::FullConsensus);

    let round_dir = dir.path().join(dossier.task_id.as_str()).join("round_00");
    let debates_dir = round_dir.join("debates");
    assert!(debates_dir.exists());
    for name in ["rustacean", "gopher", "pythonista"] {
        assert!(debates_dir.join(format!("{name}.md")).exists());
    }
}
