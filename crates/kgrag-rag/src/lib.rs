//! # kgrag RAG
//!
//! Retrieval over a knowledge graph: embed every node's text once, find the
//! nodes nearest to a question, expand each into its one-hop neighbourhood,
//! and ask a generator to answer from that context alone.
//!
//! ## Pipeline
//!
//! | Stage | Type |
//! |-------|------|
//! | Node text -> vectors, slot -> node id | [`IndexCatalog`] |
//! | Node -> description, name, outgoing edges | [`NeighborhoodContextBuilder`] |
//! | Context + question -> answer | [`AnswerGenerator`] |
//! | Lifecycle, ranking, fan-out | [`RetrievalEngine`] |
//!
//! Two ranking strategies share the same pipeline. [`Strategy::Precomputed`]
//! searches the index built at startup (and on rebuild); [`Strategy::Naive`]
//! re-embeds the whole graph for every query and is kept as a baseline.

pub mod catalog;
pub mod context;
pub mod engine;
pub mod error;
pub mod generator;
pub mod prelude;

pub use catalog::{BuildReport, IndexCatalog, RankedNode};
pub use context::{NeighborhoodContext, NeighborhoodContextBuilder};
pub use engine::{
    EngineConfig, EngineState, EngineStats, IndexSnapshot, RetrievalEngine, Strategy,
    NO_RELEVANT_INFORMATION,
};
pub use error::{RagError, RagResult};
pub use generator::{AnswerGenerator, LlmAnswerGenerator};
