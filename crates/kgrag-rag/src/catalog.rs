//! Slot-to-node catalog over a vector index.
//!
//! An [`IndexCatalog`] is built in one pass over the graph and never changes
//! afterwards. Every slot in its vector index has exactly one catalog entry,
//! so a search hit always resolves back to a graph node.

use crate::error::{RagError, RagResult};
use kgrag_core::{GraphNodeId, GraphReader};
use kgrag_embeddings::{Embedder, EmbeddingError};
use kgrag_vectors::{FlatIndex, IndexSlot, VectorIndex};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Counts from one catalog build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Nodes listed by the graph reader.
    pub scanned: usize,
    /// Nodes embedded and inserted.
    pub indexed: usize,
    /// Nodes with neither a description nor a name.
    pub skipped_untextual: usize,
    /// Nodes whose embedding call failed.
    pub failed: usize,
}

/// A search hit resolved to its graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub slot: IndexSlot,
    pub node_id: GraphNodeId,
    pub distance: f32,
}

/// A vector index paired with the slot -> node id mapping built alongside it.
pub struct IndexCatalog {
    index: Box<dyn VectorIndex>,
    nodes: Vec<GraphNodeId>,
    report: BuildReport,
    model: String,
}

impl std::fmt::Debug for IndexCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCatalog")
            .field("dimension", &self.index.dimension())
            .field("len", &self.nodes.len())
            .field("report", &self.report)
            .field("model", &self.model)
            .finish()
    }
}

impl IndexCatalog {
    /// Build a catalog over an exact [`FlatIndex`] sized to the embedder.
    pub fn build(reader: &dyn GraphReader, embedder: &dyn Embedder) -> RagResult<Self> {
        Self::build_into(
            Box::new(FlatIndex::new(embedder.dimension())),
            reader,
            embedder,
        )
    }

    /// Build a catalog into a caller-supplied empty index.
    ///
    /// Each node's display text (description, else name) is embedded and
    /// inserted. Untextual nodes are skipped. A failed embedding call skips
    /// that node; a vector of the wrong length aborts the whole build.
    pub fn build_into(
        mut index: Box<dyn VectorIndex>,
        reader: &dyn GraphReader,
        embedder: &dyn Embedder,
    ) -> RagResult<Self> {
        let listed = reader.list_textual_nodes()?;
        let mut nodes = Vec::with_capacity(listed.len());
        let mut report = BuildReport {
            scanned: listed.len(),
            ..BuildReport::default()
        };

        for node in &listed {
            let Some(text) = node.display_text() else {
                debug!(node = %node.id, "Skipping node without text");
                report.skipped_untextual += 1;
                continue;
            };

            let vector = match embedder.embed(text) {
                Ok(vector) => vector,
                Err(e @ EmbeddingError::DimensionMismatch { .. }) => return Err(e.into()),
                Err(e) => {
                    warn!(node = %node.id, error = %e, "Embedding failed, node left out of index");
                    report.failed += 1;
                    continue;
                }
            };

            let slot = index.insert(vector)?;
            debug_assert_eq!(slot, nodes.len());
            nodes.push(node.id.clone());
        }

        report.indexed = nodes.len();
        info!(
            scanned = report.scanned,
            indexed = report.indexed,
            skipped = report.skipped_untextual,
            failed = report.failed,
            model = embedder.model_name(),
            "Built index catalog"
        );

        Ok(Self {
            index,
            nodes,
            report,
            model: embedder.model_name().to_string(),
        })
    }

    /// Map a slot back to its node id.
    pub fn resolve(&self, slot: IndexSlot) -> RagResult<GraphNodeId> {
        match self.nodes.get(slot) {
            Some(id) => Ok(id.clone()),
            None => {
                error!(slot, len = self.nodes.len(), "Slot has no catalog entry");
                Err(RagError::UnknownSlot(slot))
            }
        }
    }

    /// Nearest nodes to `query`, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> RagResult<Vec<RankedNode>> {
        self.index
            .search(query, k)?
            .into_iter()
            .map(|hit| {
                Ok(RankedNode {
                    slot: hit.slot,
                    node_id: self.resolve(hit.slot)?,
                    distance: hit.distance,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn report(&self) -> BuildReport {
        self.report
    }

    /// Name of the embedding model the vectors came from.
    pub fn model(&self) -> &str {
        &self.model
    }
}
