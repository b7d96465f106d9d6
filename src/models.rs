use serde::{Deserialize, Serialize};

/// Fallback label for documents indexed without a source.
pub const UNKNOWN_SOURCE: &str = "desconhecida";

/// An immutable unit of retrieved text, produced offline during indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Where the text came from (norm article, tariff table, ...).
    #[serde(default)]
    pub source: Option<String>,
}

impl Document {
    /// Source label for display in the context block.
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }
}

/// A document paired with its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// A single message in a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
