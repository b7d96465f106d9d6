use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{Document, ScoredDocument};

/// One entry of the serialized store artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    content: String,
    #[serde(default)]
    source: Option<String>,
    embedding: Vec<f32>,
}

/// Read-only document store backed by a pre-built on-disk artifact.
///
/// The artifact (`documents.json`) is produced by an offline indexing tool
/// and loaded wholesale at startup. This store never writes.
pub struct DocumentStore {
    entries: Vec<StoredEntry>,
}

impl DocumentStore {
    /// Load the artifact from `store_dir`. Fails if the artifact is missing
    /// or malformed; the startup routine decides how to degrade.
    pub fn load(store_dir: &Path) -> Result<Self> {
        let path = store_dir.join("documents.json");
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read document store at {}", path.display()))?;
        let entries: Vec<StoredEntry> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse document store at {}", path.display()))?;
        Ok(Self { entries })
    }

    /// Nearest neighbors of `query_embedding` by cosine similarity,
    /// descending, truncated to `top_k`. `min_score` optionally drops
    /// low-similarity hits; None keeps everything.
    pub fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        min_score: Option<f32>,
    ) -> Vec<ScoredDocument> {
        let mut scored: Vec<(f32, &StoredEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .filter(|(score, _)| min_score.map_or(true, |min| *score >= min))
            .collect();

        // Sort descending by score
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(score, e)| ScoredDocument {
                document: Document {
                    content: e.content.clone(),
                    source: e.source.clone(),
                },
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
