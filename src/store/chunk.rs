//! Chunked Markdown artifact format: a short frontmatter block plus up to
//! three delimited regions of increasing detail (SUMMARY, CONCLUSION,
//! FULL). Chunk markers are HTML comments, invisible when the artifact is
//! rendered as Markdown — matching the teacher's own habit of hand-writing
//! Markdown reports (`a2a::debate::DebateSession::summary_report`).

use crate::error::DebateError;

pub const SUMMARY: &str = "SUMMARY";
pub const CONCLUSION: &str = "CONCLUSION";
pub const FULL: &str = "FULL";

/// The four load levels a downstream reader may request, ordered from
/// least to most detail so "at or below this level" is a numeric
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadLevel {
    Metadata = 0,
    Summary = 1,
    Conclusion = 2,
    Full = 3,
}

fn chunk_level(name: &str) -> LoadLevel {
    match name {
        SUMMARY => LoadLevel::Summary,
        CONCLUSION => LoadLevel::Conclusion,
        FULL => LoadLevel::Full,
        _ => LoadLevel::Full,
    }
}

/// `task_id`, creation timestamp, and status carried above the chunk
/// regions of every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frontmatter {
    pub task_id: String,
    pub timestamp: String,
    pub status: String,
}

/// A parsed or about-to-be-rendered chunked artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedArtifact {
    pub frontmatter: Frontmatter,
    /// Chunks in the order they were written: typically
    /// `[(SUMMARY, ..), (CONCLUSION, ..), (FULL, ..)]`, but callers may
    /// write a subset (e.g. `TASK.md` carries only `FULL`).
    pub chunks: Vec<(String, String)>,
}

/// The result of loading an artifact at a given level: frontmatter is
/// always returned, `content` is the concatenation of every chunk at or
/// below the requested level (empty at `Metadata`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedArtifact {
    pub frontmatter: Frontmatter,
    pub content: String,
}

impl ChunkedArtifact {
    pub fn new(frontmatter: Frontmatter, chunks: Vec<(String, String)>) -> Self {
        Self { frontmatter, chunks }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("---\n");
        out.push_str(&format!("task_id: {}\n", self.frontmatter.task_id));
        out.push_str(&format!("timestamp: {}\n", self.frontmatter.timestamp));
        out.push_str(&format!("status: {}\n", self.frontmatter.status));
        out.push_str("---\n\n");
        for (name, content) in &self.chunks {
            out.push_str(&format!("<!-- BEGIN:{name} -->\n"));
            out.push_str(content);
            out.push('\n');
            out.push_str(&format!("<!-- END:{name} -->\n\n"));
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self, DebateError> {
        let mut lines = text.lines();

        match lines.next() {
            Some(l) if l.trim() == "---" => {}
            _ => return Err(DebateError::MalformedArtifact("missing frontmatter open fence".into())),
        }

        let mut fm: std::collections::HashMap<String, String> = std::collections::HashMap::new();
        loop {
            match lines.next() {
                Some(l) if l.trim() == "---" => break,
                Some(l) => {
                    if let Some((key, value)) = l.split_once(':') {
                        fm.insert(key.trim().to_string(), value.trim().to_string());
                    }
                }
                None => return Err(DebateError::MalformedArtifact("unterminated frontmatter".into())),
            }
        }

        let frontmatter = Frontmatter {
            task_id: fm.remove("task_id").unwrap_or_default(),
            timestamp: fm.remove("timestamp").unwrap_or_default(),
            status: fm.remove("status").unwrap_or_default(),
        };

        let mut chunks = Vec::new();
        let mut current: Option<(String, Vec<&str>)> = None;
        for line in lines {
            let trimmed = line.trim();
            if let Some(name) = trimmed.strip_prefix("<!-- BEGIN:").and_then(|s| s.strip_suffix(" -->")) {
                current = Some((name.to_string(), Vec::new()));
            } else if let Some(name) = trimmed.strip_prefix("<!-- END:").and_then(|s| s.strip_suffix(" -->")) {
                if let Some((open_name, buf)) = current.take()
                    && open_name == name
                {
                    chunks.push((open_name, buf.join("\n")));
                }
            } else if let Some((_, buf)) = current.as_mut() {
                buf.push(line);
            }
        }

        Ok(Self { frontmatter, chunks })
    }

    /// Extract the chunk(s) at or below `level`, concatenated in
    /// ascending-detail order. Empty at `Metadata`.
    pub fn load(&self, level: LoadLevel) -> LoadedArtifact {
        let content = if level == LoadLevel::Metadata {
            String::new()
        } else {
            self.chunks
                .iter()
                .filter(|(name, _)| chunk_level(name) <= level)
                .map(|(_, content)| content.trim_end_matches('\n'))
                .collect::<Vec<_>>()
                .join("\n")
        };

        LoadedArtifact {
            frontmatter: self.frontmatter.clone(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChunkedArtifact {
        ChunkedArtifact::new(
            Frontmatter {
                task_id: "task-1".into(),
                timestamp: "2026-07-27T00:00:00Z".into(),
                status: "recorded".into(),
            },
            vec![
                (SUMMARY.into(), "short summary".into()),
                (CONCLUSION.into(), "short summary\nkey points here".into()),
                (FULL.into(), "the full analysis text goes here".into()),
            ],
        )
    }

    #[test]
    fn round_trips_through_render_and_parse() {
        let artifact = sample();
        let rendered = artifact.render();
        let parsed = ChunkedArtifact::parse(&rendered).unwrap();
        assert_eq!(parsed.frontmatter, artifact.frontmatter);
        assert_eq!(parsed.chunks, artifact.chunks);
    }

    #[test]
    fn full_level_concatenates_all_chunks() {
        let artifact = sample();
        let loaded = artifact.load(LoadLevel::Full);
        assert!(loaded.content.contains("short summary"));
        assert!(loaded.content.contains("key points here"));
        assert!(loaded.content.contains("the full analysis text"));
    }

    #[test]
    fn lower_levels_omit_higher_detail() {
        let artifact = sample();
        let summary_only = artifact.load(LoadLevel::Summary);
        assert!(!summary_only.content.contains("the full analysis text"));

        let metadata_only = artifact.load(LoadLevel::Metadata);
        assert!(metadata_only.content.is_empty());
        assert_eq!(metadata_only.frontmatter.task_id, "task-1");
    }
}
