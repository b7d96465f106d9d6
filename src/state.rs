use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::RagPipeline;
use crate::store::DocumentStore;

/// Outcome of startup: either a working pipeline or a reason it is missing.
///
/// Checked once per inbound message; the reason is logged, never sent to
/// clients (they get a fixed unavailability string).
#[derive(Clone)]
pub enum PipelineStatus {
    Ready(Arc<RagPipeline>),
    Unavailable { reason: String },
}

/// Shared application state, constructed once at boot and read-only after.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub pipeline: PipelineStatus,
}

impl AppState {
    /// Startup routine. Never fails outright: a missing or corrupt store
    /// artifact and a missing credential all downgrade to a servable
    /// degraded mode where every question gets the unavailability reply.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let pipeline = build_pipeline(&config, &http_client);

        match &pipeline {
            PipelineStatus::Ready(_) => tracing::info!("Answer pipeline ready"),
            PipelineStatus::Unavailable { reason } => {
                tracing::warn!("Answer pipeline unavailable: {reason}")
            }
        }

        Ok(Self {
            config,
            http_client,
            pipeline,
        })
    }
}

fn build_pipeline(config: &Config, http_client: &reqwest::Client) -> PipelineStatus {
    if !config.store_dir.exists() {
        return PipelineStatus::Unavailable {
            reason: format!("document store not found at {}", config.store_dir.display()),
        };
    }

    let store = match DocumentStore::load(&config.store_dir) {
        Ok(store) => {
            tracing::info!("Document store loaded: {} documents", store.len());
            Arc::new(store)
        }
        Err(e) => {
            return PipelineStatus::Unavailable {
                reason: format!("failed to load document store: {e:#}"),
            };
        }
    };

    // Hosted providers need a credential; a local Ollama does not.
    if config.llm.provider == "openai" && config.llm.api_key.is_none() {
        return PipelineStatus::Unavailable {
            reason: "LLM_API_KEY not set".to_string(),
        };
    }

    PipelineStatus::Ready(Arc::new(RagPipeline::new(
        store,
        http_client.clone(),
        config.llm.clone(),
        config.retrieval.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_store(dir: &std::path::Path) -> Config {
        Config {
            store_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_store_dir_degrades() {
        let config = Config {
            store_dir: PathBuf::from("/nonexistent/store"),
            ..Config::default()
        };
        let state = AppState::new(config).unwrap();
        assert!(matches!(
            state.pipeline,
            PipelineStatus::Unavailable { .. }
        ));
    }

    #[test]
    fn test_corrupt_store_degrades() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents.json"), "garbage").unwrap();

        let state = AppState::new(config_with_store(dir.path())).unwrap();
        match state.pipeline {
            PipelineStatus::Unavailable { reason } => {
                assert!(reason.contains("document store"))
            }
            PipelineStatus::Ready(_) => panic!("corrupt store must not yield a pipeline"),
        }
    }

    #[test]
    fn test_missing_credential_degrades() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents.json"), "[]").unwrap();

        let mut config = config_with_store(dir.path());
        config.llm.provider = "openai".to_string();
        config.llm.api_key = None;

        let state = AppState::new(config).unwrap();
        match state.pipeline {
            PipelineStatus::Unavailable { reason } => assert!(reason.contains("LLM_API_KEY")),
            PipelineStatus::Ready(_) => panic!("missing credential must not yield a pipeline"),
        }
    }

    #[test]
    fn test_store_and_credential_present_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("documents.json"),
            r#"[{"content":"doc","source":"f","embedding":[0.1]}]"#,
        )
        .unwrap();

        let mut config = config_with_store(dir.path());
        config.llm.api_key = Some("test-key".to_string());

        let state = AppState::new(config).unwrap();
        assert!(matches!(state.pipeline, PipelineStatus::Ready(_)));
    }

    #[test]
    fn test_ollama_provider_needs_no_credential() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents.json"), "[]").unwrap();

        let mut config = config_with_store(dir.path());
        config.llm.provider = "ollama".to_string();
        config.llm.api_key = None;

        let state = AppState::new(config).unwrap();
        assert!(matches!(state.pipeline, PipelineStatus::Ready(_)));
    }
}
