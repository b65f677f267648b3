//! # kgrag Core
//!
//! Shared types for the knowledge-graph retrieval engine.
//!
//! - [`types`]: node identifiers, node fields, neighbour edges
//! - [`records`]: the entity/relationship records produced by extraction
//! - [`graph`]: the read-only [`GraphReader`](graph::GraphReader) contract
//! - [`memory`]: an in-memory graph store that loads extraction records
//!
//! ## Quick Start
//!
//! ```rust
//! use kgrag_core::prelude::*;
//!
//! let data = StructuredData::from_json_str(r#"{
//!     "entities": [
//!         {"id": "1", "name": "India", "type": "Country", "description": "A country in South Asia."},
//!         {"id": "2", "name": "Pandemic", "type": "Event", "description": "Global outbreak of a disease."}
//!     ],
//!     "relationships": [
//!         {"from": "1", "to": "2", "type": "affected_by", "context": "Economic impact due to the pandemic"}
//!     ]
//! }"#).unwrap();
//!
//! let graph = InMemoryGraph::new();
//! let report = graph.load(&data).unwrap();
//! assert_eq!(report.nodes_merged, 2);
//!
//! let edges = graph.neighbors(&GraphNodeId::new("1")).unwrap();
//! assert_eq!(edges[0].target_name, "Pandemic");
//! ```

pub mod error;
pub mod graph;
pub mod memory;
pub mod prelude;
pub mod records;
pub mod types;

pub use error::{GraphError, GraphResult};
pub use graph::GraphReader;
pub use memory::{InMemoryGraph, LoadReport};
pub use records::{Entity, Relationship, StructuredData};
pub use types::{GraphNodeId, NeighborEdge, NodeFields, TextualNode};
