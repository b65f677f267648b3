//! # kgrag LLM
//!
//! Text generation for the retrieval engine.
//!
//! Two jobs go through an [`LlmBackend`]:
//! - answering a question from a serialized graph context
//! - extracting entity/relationship records from a document chunk
//!
//! ## Features
//!
//! - `api`: OpenAI chat completions (and compatible endpoints)
//! - `local`: Ollama
//! - `full`: All backends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kgrag_llm::{LlmBackend, OpenAiBackend};
//!
//! let backend = OpenAiBackend::from_env()?;
//! let answer = backend.answer("Which country?", "Name: India").await?;
//! ```

mod backend;
mod prompt;

pub use backend::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
pub use prompt::{parse_extraction_json, AnswerPrompt, ExtractionPrompt, PromptTemplate};

#[cfg(feature = "local")]
mod ollama;
#[cfg(feature = "local")]
pub use ollama::OllamaBackend;

#[cfg(feature = "api")]
mod openai;
#[cfg(feature = "api")]
pub use openai::OpenAiBackend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
    pub use crate::{AnswerPrompt, ExtractionPrompt, PromptTemplate};

    #[cfg(feature = "local")]
    pub use crate::OllamaBackend;

    #[cfg(feature = "api")]
    pub use crate::OpenAiBackend;
}
