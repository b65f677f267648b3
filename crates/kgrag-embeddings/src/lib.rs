//! # kgrag Embeddings
//!
//! Text → vector conversion for the retrieval engine.
//!
//! Every backend implements [`Embedder`] and reports a fixed output
//! dimension; all vectors placed in one index must share it.
//!
//! ## Features
//!
//! - `api`: OpenAI-compatible embedding endpoints
//!
//! ## Usage
//!
//! ```rust
//! use kgrag_embeddings::{Embedder, SimpleEmbedder};
//!
//! let embedder = SimpleEmbedder::new(384);
//! let vector = embedder.embed("Berlin is the capital of Germany").unwrap();
//! assert_eq!(vector.len(), embedder.dimension());
//! ```

mod chunker;
mod embedder;
mod normalize;
mod simple;

pub use chunker::{Chunk, LineChunker};
pub use embedder::{Embedder, EmbeddingError, EmbeddingResult};
pub use normalize::normalize_l2;
pub use simple::SimpleEmbedder;

#[cfg(feature = "api")]
mod api;
#[cfg(feature = "api")]
pub use api::{ApiConfig, ApiEmbedder, ApiProvider};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Embedder, EmbeddingError, EmbeddingResult};
    pub use crate::{LineChunker, SimpleEmbedder};

    #[cfg(feature = "api")]
    pub use crate::{ApiConfig, ApiEmbedder};
}
