//! Wiring from configuration to engine components.

use anyhow::{bail, Context, Result};
use kgrag_core::{InMemoryGraph, LoadReport, StructuredData};
use kgrag_embeddings::{ApiConfig, ApiEmbedder, Embedder, SimpleEmbedder};
use kgrag_llm::{LlmBackend, LlmConfig, MockBackend, OllamaBackend, OpenAiBackend};
use kgrag_rag::{LlmAnswerGenerator, RetrievalEngine};
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, EmbeddingConfig, EmbeddingProvider, LlmProvider, LlmSection};

fn openai_key() -> Result<String> {
    std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")
}

/// Build the configured embedder.
///
/// Must be called outside the async runtime, and the returned `Arc` must
/// outlive it: the API embedder owns a blocking HTTP client.
pub fn embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.provider {
        EmbeddingProvider::Simple => Arc::new(SimpleEmbedder::new(config.dimension)),
        EmbeddingProvider::Openai => {
            let mut api = ApiConfig::openai(&openai_key()?).with_dimensions(config.dimension);
            if let Some(model) = &config.model {
                api = api.with_model(model);
            }
            Arc::new(ApiEmbedder::new(api)?)
        }
        EmbeddingProvider::Custom => {
            let Some(endpoint) = &config.endpoint else {
                bail!("embedding.endpoint is required for the custom provider");
            };
            let key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
            let model = config.model.as_deref().unwrap_or("default");
            Arc::new(ApiEmbedder::new(ApiConfig::custom(
                endpoint,
                &key,
                model,
                config.dimension,
            ))?)
        }
    };
    Ok(embedder)
}

/// Build the configured LLM backend.
pub fn backend(config: &LlmSection) -> Result<Arc<dyn LlmBackend>> {
    let tune = |base: LlmConfig| {
        let base = base
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
            .with_timeout(config.timeout_secs);
        match &config.model {
            Some(model) => base.with_model(model.clone()),
            None => base,
        }
    };

    let backend: Arc<dyn LlmBackend> = match config.provider {
        LlmProvider::Mock => Arc::new(MockBackend::echo()),
        LlmProvider::Openai => {
            let backend = OpenAiBackend::with_config(&openai_key()?, tune(LlmConfig::openai()));
            match &config.endpoint {
                Some(endpoint) => Arc::new(backend.with_endpoint(endpoint)),
                None => Arc::new(backend),
            }
        }
        LlmProvider::Ollama => {
            let endpoint = config.endpoint.as_deref().unwrap_or("http://localhost:11434");
            Arc::new(OllamaBackend::with_config(endpoint, tune(LlmConfig::ollama())))
        }
    };
    Ok(backend)
}

/// Read a records file into a fresh in-memory graph.
pub fn graph(path: &Path) -> Result<(Arc<InMemoryGraph>, LoadReport)> {
    let data = StructuredData::from_json_file(path)
        .with_context(|| format!("Failed to read records: {}", path.display()))?;
    let graph = InMemoryGraph::new();
    let report = graph.load(&data)?;
    Ok((Arc::new(graph), report))
}

pub fn engine(
    config: &Config,
    embedder: Arc<dyn Embedder>,
    graph: Arc<InMemoryGraph>,
) -> Result<RetrievalEngine> {
    let generator = LlmAnswerGenerator::new(backend(&config.llm)?);
    Ok(RetrievalEngine::with_config(
        embedder,
        graph,
        Arc::new(generator),
        config.retrieval.engine_config(),
    ))
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_offline_components() {
        let config = Config::default();
        let embedder = embedder(&config.embedding).unwrap();
        assert_eq!(embedder.dimension(), 384);
        assert_eq!(embedder.model_name(), "simple-hash");
        assert_eq!(backend(&config.llm).unwrap().name(), "mock");
    }

    #[test]
    fn custom_embedding_needs_endpoint() {
        let config = EmbeddingConfig {
            provider: EmbeddingProvider::Custom,
            ..EmbeddingConfig::default()
        };
        assert!(embedder(&config).is_err());
    }

    #[test]
    fn ollama_takes_model_override() {
        let section = LlmSection {
            provider: LlmProvider::Ollama,
            model: Some("mistral".to_string()),
            ..LlmSection::default()
        };
        let backend = backend(&section).unwrap();
        assert_eq!(backend.name(), "ollama");
        assert_eq!(backend.config().model, "mistral");
        assert_eq!(backend.config().timeout_secs, 30);
    }

    #[test]
    fn graph_loads_records_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structured_data.json");
        std::fs::write(
            &path,
            r#"{"entities": [{"id": "1", "name": "India"}, {"id": "2", "name": "Pandemic"}],
                "relationships": [{"from": "1", "to": "2", "type": "affected_by"}]}"#,
        )
        .unwrap();

        let (graph, report) = graph(&path).unwrap();
        assert_eq!(report.nodes_merged, 2);
        assert_eq!(report.edges_merged, 1);
        assert_eq!(graph.edge_count().unwrap(), 1);
    }
}
