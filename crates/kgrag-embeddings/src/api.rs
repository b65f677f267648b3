//! API-based embeddings over the OpenAI `/v1/embeddings` wire format.
//!
//! Requires the `api` feature. Any server speaking the same format
//! (vLLM, LiteLLM, a local gateway) works through [`ApiConfig::custom`].
//!
//! The client is blocking; call it from a blocking context
//! (`tokio::task::spawn_blocking` inside async code).

use crate::{Embedder, EmbeddingError, EmbeddingResult};
use serde::{Deserialize, Serialize};

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// API provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiProvider {
    /// OpenAI embeddings (text-embedding-3-small, text-embedding-ada-002).
    OpenAI,
    /// Custom OpenAI-compatible endpoint.
    Custom,
}

/// Configuration for API-based embeddings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub provider: ApiProvider,
    pub api_key: String,
    pub model: String,
    /// Endpoint override; `None` uses the provider default.
    pub endpoint: Option<String>,
    /// Output dimension. Sent to the API when `send_dimensions` is set.
    pub dimensions: usize,
    /// Whether the model accepts a requested output dimension.
    pub send_dimensions: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create config for OpenAI embeddings (1536 dimensions).
    pub fn openai(api_key: &str) -> Self {
        Self {
            provider: ApiProvider::OpenAI,
            api_key: api_key.to_string(),
            model: "text-embedding-3-small".to_string(),
            endpoint: None,
            dimensions: 1536,
            send_dimensions: true,
            timeout_secs: 30,
        }
    }

    /// Create config for a custom OpenAI-compatible endpoint.
    pub fn custom(endpoint: &str, api_key: &str, model: &str, dimensions: usize) -> Self {
        Self {
            provider: ApiProvider::Custom,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: Some(endpoint.to_string()),
            dimensions,
            send_dimensions: false,
            timeout_secs: 30,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Stop sending `dimensions` (for models with a fixed output size, e.g. ada-002).
    pub fn without_dimension_request(mut self) -> Self {
        self.send_dimensions = false;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// API-based embedder.
///
/// # Example
///
/// ```rust,ignore
/// use kgrag_embeddings::{ApiEmbedder, ApiConfig, Embedder};
///
/// let embedder = ApiEmbedder::new(ApiConfig::openai("sk-..."))?;
/// let vec = embedder.embed("What was the impact of the pandemic?")?;
/// ```
pub struct ApiEmbedder {
    config: ApiConfig,
    client: reqwest::blocking::Client,
}

impl ApiEmbedder {
    pub fn new(config: ApiConfig) -> EmbeddingResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create an OpenAI embedder from `OPENAI_API_KEY`.
    pub fn from_env() -> EmbeddingResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| EmbeddingError::ApiError("OPENAI_API_KEY is not set".to_string()))?;
        Self::new(ApiConfig::openai(&api_key))
    }

    fn endpoint(&self) -> &str {
        match (&self.config.endpoint, self.config.provider) {
            (Some(endpoint), _) => endpoint,
            (None, ApiProvider::OpenAI) => OPENAI_EMBEDDINGS_URL,
            (None, ApiProvider::Custom) => "",
        }
    }

    fn request(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let endpoint = self.endpoint();
        if endpoint.is_empty() {
            return Err(EmbeddingError::ApiError(
                "Custom provider requires an endpoint".to_string(),
            ));
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            dimensions: self.config.send_dimensions.then_some(self.config.dimensions),
        };

        let mut builder = self.client.post(endpoint).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = builder
            .send()
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::ApiError(format!(
                "Embedding API error {}: {}",
                status, body
            )));
        }

        let mut resp: EmbeddingResponse = response
            .json()
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        if resp.data.len() != texts.len() {
            return Err(EmbeddingError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                resp.data.len()
            )));
        }

        resp.data.sort_by_key(|d| d.index);
        let vectors: Vec<Vec<f32>> = resp.data.into_iter().map(|d| d.embedding).collect();
        for v in &vectors {
            self.check_dimension(v)?;
        }
        Ok(vectors)
    }
}

impl Embedder for ApiEmbedder {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }
        self.request(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::ApiError("No embedding returned".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.request(texts)
    }

    fn dimension(&self) -> usize {
        self.config.dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let openai = ApiConfig::openai("test-key");
        assert_eq!(openai.provider, ApiProvider::OpenAI);
        assert_eq!(openai.model, "text-embedding-3-small");
        assert_eq!(openai.dimensions, 1536);

        let custom = ApiConfig::custom("http://localhost:8080/v1/embeddings", "", "bge-small", 384);
        assert_eq!(custom.provider, ApiProvider::Custom);
        assert!(!custom.send_dimensions);
        assert_eq!(custom.dimensions, 384);
    }

    #[test]
    fn test_config_chaining() {
        let config = ApiConfig::openai("key")
            .with_model("text-embedding-ada-002")
            .with_dimensions(1536)
            .without_dimension_request()
            .with_timeout(60);

        assert_eq!(config.model, "text-embedding-ada-002");
        assert!(!config.send_dimensions);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn request_omits_dimensions_when_not_requested() {
        let input = ["hello"];
        let request = EmbeddingRequest {
            model: "m",
            input: &input,
            dimensions: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("dimensions").is_none());
        assert_eq!(json["input"][0], "hello");
    }

    #[test]
    fn custom_provider_without_endpoint_fails() {
        let mut config = ApiConfig::custom("", "", "m", 8);
        config.endpoint = None;
        let embedder = ApiEmbedder::new(config).unwrap();
        assert!(matches!(
            embedder.embed("text"),
            Err(EmbeddingError::ApiError(_))
        ));
    }
}
