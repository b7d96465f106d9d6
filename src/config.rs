use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the pre-built document store artifact
    pub store_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Retrieval policy
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for chat completion
    pub chat_model: String,
    /// Model name for query embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Embedding vector dimension
    pub embedding_dim: usize,
}

/// Retrieval policy for the answer pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents fetched per question.
    pub top_k: usize,
    /// Minimum cosine similarity for a document to be included.
    /// None keeps all top-k hits regardless of score.
    pub min_score: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("./store"),
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "multilingual-e5-large".to_string(),
            api_key: None,
            embedding_dim: 1024,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_score: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. `from_env` passes
    /// the process environment; tests pass a map. Unparseable values keep
    /// the default.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = var("REGCHAT_STORE_DIR") {
            config.store_dir = PathBuf::from(dir);
        }
        if let Some(addr) = var("REGCHAT_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(provider) = var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Some(url) = var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Some(model) = var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Some(key) = var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Some(dim) = var("LLM_EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.llm.embedding_dim = d;
            }
        }
        if let Some(val) = var("REGCHAT_TOP_K") {
            if let Ok(v) = val.parse() {
                config.retrieval.top_k = v;
            }
        }
        if let Some(val) = var("REGCHAT_MIN_SCORE") {
            if let Ok(v) = val.parse() {
                config.retrieval.min_score = Some(v);
            }
        }

        config
    }

    /// Path of the serialized document store artifact.
    pub fn store_path(&self) -> PathBuf {
        self.store_dir.join("documents.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retrieval_policy() {
        let config = Config::default();
        assert_eq!(config.retrieval.top_k, 10);
        assert!(config.retrieval.min_score.is_none());
    }

    #[test]
    fn test_store_path_is_inside_store_dir() {
        let config = Config::default();
        assert_eq!(config.store_path(), PathBuf::from("./store/documents.json"));
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = Config::from_vars(vars(&[
            ("REGCHAT_STORE_DIR", "/data/store"),
            ("LLM_API_KEY", "sk-test"),
            ("REGCHAT_TOP_K", "5"),
            ("REGCHAT_MIN_SCORE", "0.25"),
        ]));
        assert_eq!(config.store_dir, PathBuf::from("/data/store"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.min_score, Some(0.25));
    }

    #[test]
    fn test_from_vars_empty_keeps_defaults() {
        let config = Config::from_vars(|_| None);
        assert_eq!(config.retrieval.top_k, 10);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_from_vars_unparseable_numbers_keep_defaults() {
        let config = Config::from_vars(vars(&[
            ("REGCHAT_TOP_K", "dez"),
            ("REGCHAT_MIN_SCORE", "alto"),
            ("LLM_EMBEDDING_DIM", "-"),
        ]));
        assert_eq!(config.retrieval.top_k, 10);
        assert!(config.retrieval.min_score.is_none());
        assert_eq!(config.llm.embedding_dim, 1024);
    }
}
