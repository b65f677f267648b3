//! Prelude: import everything needed to read and load a knowledge graph.

pub use crate::error::{GraphError, GraphResult};
pub use crate::graph::GraphReader;
pub use crate::memory::{InMemoryGraph, LoadReport};
pub use crate::records::{Entity, Relationship, StructuredData};
pub use crate::types::{GraphNodeId, NeighborEdge, NodeFields, TextualNode};
