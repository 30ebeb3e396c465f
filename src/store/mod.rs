//! Chunked Context Store (C6): a durable, hierarchical filesystem-backed
//! log of every phase artifact, keyed by `task_id`.
//!
//! ```text
//! <task_id>/
//!   TASK.md
//!   round_{NN}/
//!     <participant>.md
//!     reviews/<reviewer>__reviews__<reviewed>.md
//!     debates/<participant>.md
//!     CONSENSUS.md
//!   FINAL.md
//! ```
//!
//! Writes are full-file rewrites per artifact (write-to-temp + rename);
//! the orchestrator never issues concurrent writes for a single path, but
//! parallel writes to distinct paths are expected and safe.

mod chunk;

pub use chunk::{ChunkedArtifact, Frontmatter, LoadLevel, LoadedArtifact, CONCLUSION, FULL, SUMMARY};

use crate::dossier::FinalDossier;
use crate::error::DebateError;
use crate::model::{Analysis, ConsensusResult, DebateOutcome, Review, TaskId};
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, DebateError>;

pub struct ContextStore {
    root: PathBuf,
}

impl ContextStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn task_dir(&self, task_id: &TaskId) -> PathBuf {
        self.root.join(task_id.as_str())
    }

    fn round_dir(&self, task_id: &TaskId, round_index: usize) -> PathBuf {
        self.task_dir(task_id).join(format!("round_{round_index:02}"))
    }

    /// Write `TASK.md` for a newly started deliberation.
    pub async fn init_task(&self, task_id: &TaskId, task_text: &str) -> Result<()> {
        let dir = self.task_dir(task_id);
        create_dir(&dir).await?;
        let artifact = ChunkedArtifact::new(
            frontmatter(task_id, "pending"),
            vec![(FULL.to_string(), task_text.to_string())],
        );
        self.write_artifact(&dir.join("TASK.md"), &artifact).await
    }

    /// Persist one participant's analysis for a round.
    pub async fn write_analysis(&self, task_id: &TaskId, round_index: usize, analysis: &Analysis) -> Result<()> {
        let dir = self.round_dir(task_id, round_index);
        create_dir(&dir).await?;

        let summary = format!(
            "{}\nconfidence: {:.2}",
            analysis.conclusion.as_deref().unwrap_or(""),
            analysis.confidence.unwrap_or(0.0)
        );
        let mut conclusion = summary.clone();
        if !analysis.key_points.is_empty() {
            conclusion.push_str(&format!("\nkey_points: {}", analysis.key_points.join("; ")));
        }
        if let Some(version) = &analysis.participant_version {
            conclusion.push_str(&format!("\nparticipant_version: {version}"));
        }
        let full = analysis.analysis_text.clone().unwrap_or_default();

        let artifact = ChunkedArtifact::new(
            frontmatter(task_id, "recorded"),
            vec![
                (SUMMARY.to_string(), summary),
                (CONCLUSION.to_string(), conclusion),
                (FULL.to_string(), full),
            ],
        );
        self.write_artifact(&dir.join(format!("{}.md", analysis.participant_name)), &artifact)
            .await
    }

    /// Persist one reviewer/reviewed pair's review for a round.
    pub async fn write_review(&self, task_id: &TaskId, round_index: usize, review: &Review) -> Result<()> {
        let dir = self.round_dir(task_id, round_index).join("reviews");
        create_dir(&dir).await?;

        let summary = format!(
            "{} reviewing {}: {} agreements, {} disagreements",
            review.reviewer_name,
            review.reviewed_name,
            review.agreement_points.len(),
            review.disagreement_points.len()
        );
        let conclusion = format!(
            "{}\nagreements: {}\ndisagreements: {}",
            summary,
            review.agreement_points.join("; "),
            review.disagreement_points.join("; ")
        );
        let full = format!(
            "{}\n\nfeedback: {}\n\nsuggested improvements: {}",
            conclusion,
            review.feedback,
            review.suggested_improvements.join("; ")
        );

        let artifact = ChunkedArtifact::new(
            frontmatter(task_id, "recorded"),
            vec![
                (SUMMARY.to_string(), summary),
                (CONCLUSION.to_string(), conclusion),
                (FULL.to_string(), full),
            ],
        );
        let filename = format!("{}__reviews__{}.md", review.reviewer_name, review.reviewed_name);
        self.write_artifact(&dir.join(filename), &artifact).await
    }

    /// Persist one participant's debate outcome for a round.
    pub async fn write_debate(&self, task_id: &TaskId, round_index: usize, participant_name: &str, outcome: &DebateOutcome) -> Result<()> {
        let dir = self.round_dir(task_id, round_index).join("debates");
        create_dir(&dir).await?;

        let summary = outcome.updated_position.conclusion().to_string();
        let conclusion = format!(
            "{}\nconcessions: {}\nremaining disagreements: {}",
            summary,
            outcome.concessions.join("; "),
            outcome.remaining_disagreements.join("; ")
        );
        let full = format!("{}\n\nrebuttals: {}", conclusion, outcome.rebuttals.join("; "));

        let artifact = ChunkedArtifact::new(
            frontmatter(task_id, "recorded"),
            vec![
                (SUMMARY.to_string(), summary),
                (CONCLUSION.to_string(), conclusion),
                (FULL.to_string(), full),
            ],
        );
        self.write_artifact(&dir.join(format!("{participant_name}.md")), &artifact)
            .await
    }

    /// Persist a round's consensus result.
    pub async fn write_consensus(&self, task_id: &TaskId, round_index: usize, consensus: &ConsensusResult) -> Result<()> {
        let dir = self.round_dir(task_id, round_index);
        create_dir(&dir).await?;

        let summary = format!(
            "status: {:?}\npercentage: {:.2}",
            consensus.status, consensus.consensus_percentage
        );
        let conclusion = format!(
            "{}\nagreed: {}\ndisputed: {}",
            summary,
            render_clusters(&consensus.agreed_items),
            render_clusters(&consensus.disputed_items)
        );
        let full = serde_json::to_string_pretty(consensus).unwrap_or_default();

        let artifact = ChunkedArtifact::new(
            frontmatter(task_id, "recorded"),
            vec![
                (SUMMARY.to_string(), summary),
                (CONCLUSION.to_string(), conclusion),
                (FULL.to_string(), full),
            ],
        );
        self.write_artifact(&dir.join("CONSENSUS.md"), &artifact).await
    }

    /// Persist the terminal dossier. Must reference `task_id`, `status`,
    /// `consensus_percentage`, and enumerate agreed/disputed items.
    pub async fn write_final(&self, task_id: &TaskId, dossier: &FinalDossier, final_consensus_percentage: f64) -> Result<()> {
        let dir = self.task_dir(task_id);
        create_dir(&dir).await?;

        let summary = format!(
            "task_id: {}\nstatus: {:?}\nconsensus_percentage: {:.2}",
            task_id, dossier.status, final_consensus_percentage
        );
        let conclusion = format!(
            "{}\nagreed: {}\ndisputed: {}",
            summary,
            render_clusters(&dossier.agreed_items),
            render_clusters(&dossier.disputed_items)
        );
        let full = serde_json::to_string_pretty(&serde_json::json!({
            "taskId": task_id.as_str(),
            "status": format!("{:?}", dossier.status),
            "totalRounds": dossier.total_rounds,
            "finalStrategy": dossier.final_strategy,
            "agreedItems": dossier.agreed_items,
            "disputedItems": dossier.disputed_items,
        }))
        .unwrap_or_default();

        let artifact = ChunkedArtifact::new(
            frontmatter(task_id, "final"),
            vec![
                (SUMMARY.to_string(), summary),
                (CONCLUSION.to_string(), conclusion),
                (FULL.to_string(), full),
            ],
        );
        self.write_artifact(&dir.join("FINAL.md"), &artifact).await
    }

    /// Load an artifact at `path` at the requested level.
    pub async fn load(&self, path: &Path, level: LoadLevel) -> Result<LoadedArtifact> {
        let text = tokio::fs::read_to_string(path).await.map_err(DebateError::Io)?;
        let artifact = ChunkedArtifact::parse(&text)?;
        Ok(artifact.load(level))
    }

    async fn write_artifact(&self, path: &Path, artifact: &ChunkedArtifact) -> Result<()> {
        let rendered = artifact.render();
        let tmp_path = path.with_extension("md.tmp");
        tokio::fs::write(&tmp_path, rendered)
            .await
            .map_err(|source| DebateError::PersistenceFailure { path: tmp_path.clone(), source })?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|source| DebateError::PersistenceFailure { path: path.to_path_buf(), source })
    }
}

fn frontmatter(task_id: &TaskId, status: &str) -> Frontmatter {
    Frontmatter {
        task_id: task_id.as_str().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        status: status.to_string(),
    }
}

fn render_clusters(clusters: &[crate::model::ClusterSummary]) -> String {
    clusters
        .iter()
        .map(|c| format!("[{}] {} ({})", c.size, c.representative_conclusion, c.participant_names.join(", ")))
        .collect::<Vec<_>>()
        .join(" | ")
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DebateError::PersistenceFailure { path: dir.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dossier::{DossierStatus, FinalDossier};

    fn analysis() -> Analysis {
        Analysis {
            participant_name: "alpha".into(),
            participant_version: Some("gpt-5.3-codex-20260201".into()),
            analysis_text: Some("x".repeat(60)),
            conclusion: Some("Use Redis".into()),
            confidence: Some(0.9),
            key_points: vec!["fast".into(), "simple".into()],
            placeholder_flag: None,
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn writes_and_loads_analysis_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(dir.path());
        let task_id = TaskId::new();

        store.init_task(&task_id, "should we use redis?").await.unwrap();
        store.write_analysis(&task_id, 0, &analysis()).await.unwrap();

        let path = dir.path().join(task_id.as_str()).join("round_00").join("alpha.md");
        assert!(path.exists());

        let loaded = store.load(&path, LoadLevel::Full).await.unwrap();
        assert!(loaded.content.contains("Use Redis"));
        assert!(loaded.content.contains("gpt-5.3-codex-20260201"));

        let summary_only = store.load(&path, LoadLevel::Summary).await.unwrap();
        assert!(!summary_only.content.contains("gpt-5.3-codex-20260201"));
    }

    #[tokio::test]
    async fn participant_version_preserved_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(dir.path());
        let task_id = TaskId::new();
        store.write_analysis(&task_id, 0, &analysis()).await.unwrap();

        let path = dir.path().join(task_id.as_str()).join("round_00").join("alpha.md");
        let loaded = store.load(&path, LoadLevel::Conclusion).await.unwrap();
        assert!(loaded.content.contains("gpt-5.3-codex-20260201"));
    }

    #[tokio::test]
    async fn writes_final_dossier_with_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(dir.path());
        let task_id = TaskId::new();

        let dossier = FinalDossier {
            task_id: task_id.clone(),
            status: DossierStatus::FullConsensus,
            final_strategy: None,
            total_rounds: 0,
            agreed_items: vec![],
            disputed_items: vec![],
        };
        store.write_final(&task_id, &dossier, 1.0).await.unwrap();

        let path = dir.path().join(task_id.as_str()).join("FINAL.md");
        let loaded = store.load(&path, LoadLevel::Full).await.unwrap();
        assert!(loaded.content.contains(task_id.as_str()));
        assert!(loaded.content.contains("1.00"));
    }
}
