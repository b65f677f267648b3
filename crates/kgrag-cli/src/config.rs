//! Configuration management for the kgrag CLI.

use anyhow::{Context, Result};
use kgrag_rag::{EngineConfig, Strategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "kgrag.toml";

/// kgrag project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Extraction records loaded into the graph.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Raw text read by `kgrag extract`.
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,
    /// Character budget per extraction chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    #[default]
    Simple,
    Openai,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Required for `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Mock,
    Openai,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_data_file() -> PathBuf { PathBuf::from("structured_data.json") }
fn default_input_file() -> PathBuf { PathBuf::from("raw_text.txt") }
fn default_chunk_size() -> usize { 2000 }
fn default_dimension() -> usize { 384 }
fn default_max_tokens() -> u32 { 1024 }
fn default_llm_timeout() -> u32 { 30 }
fn default_top_k() -> usize { 3 }
fn default_concurrency() -> usize { 4 }
fn default_generation_timeout() -> u64 { 60 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8000 }

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            input_file: default_input_file(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model: None,
            dimension: default_dimension(),
            endpoint: None,
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            endpoint: None,
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            strategy: Strategy::default(),
            concurrency: default_concurrency(),
            generation_timeout_secs: default_generation_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl RetrievalConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_top_k(self.top_k)
            .with_strategy(self.strategy)
            .with_concurrency(self.concurrency)
            .with_generation_timeout(Duration::from_secs(self.generation_timeout_secs))
    }
}

impl Config {
    /// Load from an explicit path, or from kgrag.toml in the current or
    /// parent directories. Falls back to defaults when neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find kgrag.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.strategy, Strategy::Precomputed);
        assert_eq!(config.graph.chunk_size, 2000);
        assert_eq!(config.embedding.provider, EmbeddingProvider::Simple);
        assert_eq!(config.llm.provider, LlmProvider::Mock);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [embedding]
            provider = "openai"
            dimension = 1536

            [retrieval]
            strategy = "naive"
            generation_timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.embedding.provider, EmbeddingProvider::Openai);
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.retrieval.strategy, Strategy::Naive);
        assert_eq!(config.retrieval.top_k, 3);

        let engine = config.retrieval.engine_config();
        assert_eq!(engine.generation_timeout, Duration::from_secs(5));
        assert_eq!(engine.strategy, Strategy::Naive);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.llm.provider = LlmProvider::Ollama;
        config.llm.model = Some("mistral".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.llm.provider, LlmProvider::Ollama);
        assert_eq!(loaded.llm.model.as_deref(), Some("mistral"));
        assert_eq!(loaded.graph.data_file, PathBuf::from("structured_data.json"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[llm]\nprovider = \"claude\"\n");
        assert!(result.is_err());
    }
}
