//! Answer generation seam.

use async_trait::async_trait;
use kgrag_llm::{LlmBackend, LlmResult};
use std::sync::Arc;

/// Produces an answer to a question from a rendered context.
///
/// May be slow and may fail; the engine bounds each call with a timeout
/// and treats failures as a skipped candidate.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, question: &str, context: &str) -> LlmResult<String>;
}

/// [`AnswerGenerator`] backed by any [`LlmBackend`].
pub struct LlmAnswerGenerator {
    backend: Arc<dyn LlmBackend>,
}

impl LlmAnswerGenerator {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn generate(&self, question: &str, context: &str) -> LlmResult<String> {
        self.backend.answer(question, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgrag_llm::MockBackend;

    #[tokio::test]
    async fn delegates_to_backend_answer() {
        let backend = MockBackend::new().with_response("Answer the question: capital?", "Paris");
        let generator = LlmAnswerGenerator::new(Arc::new(backend));

        assert_eq!(generator.backend_name(), "mock");
        assert_eq!(generator.generate("capital?", "Name: Paris").await.unwrap(), "Paris");
    }
}
