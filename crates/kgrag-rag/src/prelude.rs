//! Convenient imports for building and querying an engine.
//!
//! ```rust
//! use kgrag_rag::prelude::*;
//! ```

pub use crate::catalog::{BuildReport, IndexCatalog, RankedNode};
pub use crate::context::{NeighborhoodContext, NeighborhoodContextBuilder};
pub use crate::engine::{
    EngineConfig, EngineState, RetrievalEngine, Strategy, NO_RELEVANT_INFORMATION,
};
pub use crate::error::{RagError, RagResult};
pub use crate::generator::{AnswerGenerator, LlmAnswerGenerator};

pub use kgrag_core::{GraphNodeId, GraphReader, InMemoryGraph};
pub use kgrag_embeddings::Embedder;
