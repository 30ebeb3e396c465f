//! S5 — strict mode with no registered externals fails fast, before Phase 1
//! ever runs, even though the host alone would otherwise be willing to
//! contribute.

mod support;

use conclave::{DebateError, DebateOptions, Orchestrator};

#[tokio::test]
async fn strict_mode_rejects_a_run_with_no_surviving_externals() {
    let dir = tempfile::tempdir().unwrap();
    let options = DebateOptions { include_host: true, strict: true, ..DebateOptions::default() };
    let mut orchestrator = Orchestrator::new(dir.path(), options);

    let result = orchestrator.run("Is the migration safe to run?", None).await;

    assert!(matches!(result, Err(DebateError::NoAvailableParticipants)));
    assert!(!dir.path().read_dir().unwrap().any(|_| true), "no task directory should have been created");
}
