//! Ollama backend for local LLM inference.
//!
//! Requires the `local` feature and a running Ollama instance.

use crate::backend::{LlmBackend, LlmConfig, LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Ollama backend for local LLM inference.
///
/// # Example
///
/// ```rust,ignore
/// use kgrag_llm::{OllamaBackend, LlmBackend};
///
/// let backend = OllamaBackend::localhost().with_model("mistral");
/// let answer = backend.answer("Which country?", "Name: India").await?;
/// ```
pub struct OllamaBackend {
    endpoint: String,
    config: LlmConfig,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(endpoint: &str) -> Self {
        Self::with_config(endpoint, LlmConfig::ollama())
    }

    pub fn with_config(endpoint: &str, config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs as u64))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            config,
            client,
        }
    }

    /// Create with default localhost endpoint.
    pub fn localhost() -> Self {
        Self::new("http://localhost:11434")
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    async fn request(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        let body = OllamaRequest {
            model: &self.config.model,
            prompt,
            system,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(self.status_error(status.as_u16(), detail));
        }

        response
            .json::<OllamaResponse>()
            .await
            .map(|r| r.response)
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }

    fn send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else if e.is_connect() {
            LlmError::ConnectionFailed(format!("no Ollama server at {}", self.endpoint))
        } else {
            LlmError::ApiError(e.to_string())
        }
    }

    fn status_error(&self, status: u16, detail: String) -> LlmError {
        match status {
            404 => LlmError::ModelNotFound(format!(
                "{} (pull it with `ollama pull {}`)",
                self.config.model, self.config.model
            )),
            _ => LlmError::ApiError(format!("Ollama returned {status}: {detail}")),
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.request(prompt, None).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> LlmResult<String> {
        self.request(prompt, Some(system)).await
    }

    async fn health_check(&self) -> LlmResult<bool> {
        let tags = self
            .client
            .get(format!("{}/api/tags", self.endpoint))
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;
        Ok(tags.map(|r| r.status().is_success()).unwrap_or(false))
    }
}
