//! Core LLM backend trait.

use crate::prompt::{parse_extraction_json, AnswerPrompt, ExtractionPrompt, PromptTemplate};
use async_trait::async_trait;
use kgrag_core::StructuredData;
use thiserror::Error;

/// LLM-related errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Parsing failed: {0}")]
    ParseError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u32),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Configuration for LLM requests.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name/identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Create config for OpenAI.
    pub fn openai() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            ..Self::default()
        }
    }

    /// Create config for Ollama.
    pub fn ollama() -> Self {
        Self {
            model: "llama3.2".to_string(),
            timeout_secs: 60,
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Core trait for LLM backends.
///
/// A backend only has to implement [`complete`](LlmBackend::complete); answer
/// generation and record extraction are built on top of it from the prompt
/// templates in this crate.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Get the current configuration.
    fn config(&self) -> &LlmConfig;

    /// Generate a completion for a prompt.
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Generate a completion with a separate system instruction.
    ///
    /// Backends without a system role get the instruction prepended.
    async fn complete_with_system(&self, system: &str, prompt: &str) -> LlmResult<String> {
        self.complete(&format!("{system}\n\n{prompt}")).await
    }

    /// Answer a question using only the given context.
    async fn answer(&self, question: &str, context: &str) -> LlmResult<String> {
        let prompt = AnswerPrompt::new(question, context);
        self.complete(&prompt.generate()).await
    }

    /// Extract entity and relationship records from a chunk of text.
    async fn extract(&self, text: &str) -> LlmResult<StructuredData> {
        let prompt = ExtractionPrompt::new(text);
        let response = match prompt.system_prompt() {
            Some(system) => self.complete_with_system(&system, &prompt.generate()).await?,
            None => self.complete(&prompt.generate()).await?,
        };
        parse_extraction_json(&response)
    }

    /// Check if the backend is available.
    async fn health_check(&self) -> LlmResult<bool> {
        match self.complete("ping").await {
            Ok(_) => Ok(true),
            Err(LlmError::ConnectionFailed(_)) | Err(LlmError::AuthenticationFailed) => Ok(false),
            Err(_) => Ok(true),
        }
    }
}

/// A mock backend for testing and offline runs.
///
/// Canned responses are matched by substring against the prompt, in the
/// order they were added; the first match wins. In echo
/// mode an unmatched answer prompt returns its context verbatim, which makes
/// the retrieval pipeline observable without a model.
pub struct MockBackend {
    config: LlmConfig,
    responses: Vec<(String, String)>,
    echo: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            config: LlmConfig::default(),
            responses: Vec::new(),
            echo: false,
        }
    }

    /// A mock that answers with the retrieved context.
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::new()
        }
    }

    /// Add a canned response for a prompt pattern.
    pub fn with_response(mut self, pattern: &str, response: &str) -> Self {
        self.responses.push((pattern.to_string(), response.to_string()));
        self
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        for (pattern, response) in &self.responses {
            if prompt.contains(pattern) {
                return Ok(response.clone());
            }
        }
        if self.echo {
            if let Some(context) = AnswerPrompt::context_of(prompt) {
                return Ok(context.to_string());
            }
        }
        Ok("Mock response".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend() {
        let backend = MockBackend::new().with_response("test", "Test response");

        let response = backend.complete("This is a test").await.unwrap();
        assert_eq!(response, "Test response");
        assert_eq!(backend.complete("other").await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn earliest_matching_pattern_wins() {
        let backend = MockBackend::new()
            .with_response("Name: India", "first")
            .with_response("India", "second")
            .with_response("Name:", "third");

        for _ in 0..8 {
            assert_eq!(backend.complete("Name: India").await.unwrap(), "first");
        }
        assert_eq!(backend.complete("Name: Brazil").await.unwrap(), "third");
    }

    #[tokio::test]
    async fn answer_goes_through_answer_prompt() {
        let backend = MockBackend::new().with_response("Answer the question: Which city?", "Paris");
        let answer = backend.answer("Which city?", "Name: Paris").await.unwrap();
        assert_eq!(answer, "Paris");
    }

    #[tokio::test]
    async fn echo_mock_returns_context() {
        let backend = MockBackend::echo();
        let answer = backend
            .answer("capital of France?", "Description: Capital of France\nName: Paris")
            .await
            .unwrap();
        assert_eq!(answer, "Description: Capital of France\nName: Paris");
    }

    #[tokio::test]
    async fn extract_parses_fenced_json() {
        let backend = MockBackend::new().with_response(
            "India",
            "```json\n{\"entities\": [{\"id\": \"1\", \"name\": \"India\"}], \"relationships\": []}\n```",
        );
        let data = backend.extract("India is a country.").await.unwrap();
        assert_eq!(data.entities.len(), 1);
        assert_eq!(data.entities[0].name, "India");
        assert_eq!(data.entities[0].description, "");
    }

    #[tokio::test]
    async fn extract_rejects_prose() {
        let backend = MockBackend::new();
        let result = backend.extract("anything").await;
        assert!(matches!(result, Err(LlmError::ParseError(_))));
    }

    #[tokio::test]
    async fn mock_is_healthy() {
        assert!(MockBackend::new().health_check().await.unwrap());
    }

    #[test]
    fn test_config_builders() {
        let openai = LlmConfig::openai();
        assert!(openai.model.contains("gpt"));

        let ollama = LlmConfig::ollama().with_temperature(5.0);
        assert!(ollama.model.contains("llama"));
        assert_eq!(ollama.temperature, 2.0);
        assert_eq!(ollama.timeout_secs, 60);
    }
}
