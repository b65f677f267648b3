//! Read access to the knowledge graph.
//!
//! The retrieval engine never writes to the graph. It needs three reads:
//! list every node with its text fields (build phase), fetch one node's
//! fields, and fetch its outgoing edges (query phase).

use crate::error::GraphResult;
use crate::types::{GraphNodeId, NeighborEdge, NodeFields, TextualNode};

/// Read-only handle to a graph store.
///
/// This is a trait rather than a concrete type so the engine can sit on top
/// of the in-memory store, a remote graph database, or a test double.
pub trait GraphReader: Send + Sync {
    /// List every node together with the fields its display text is derived from.
    ///
    /// Nodes without any text are included; filtering is the caller's job.
    fn list_textual_nodes(&self) -> GraphResult<Vec<TextualNode>>;

    /// Fetch a node's fields, or `None` if the node no longer exists.
    fn get_node(&self, id: &GraphNodeId) -> GraphResult<Option<NodeFields>>;

    /// Fetch a node's direct outgoing edges in store order.
    ///
    /// Returns an empty list for a node without outgoing edges and for an
    /// unknown node.
    fn neighbors(&self, id: &GraphNodeId) -> GraphResult<Vec<NeighborEdge>>;

    /// Number of nodes in the store.
    fn node_count(&self) -> GraphResult<usize> {
        Ok(self.list_textual_nodes()?.len())
    }
}
