//! In-memory graph store backed by petgraph.
//!
//! Nodes are keyed by their store-stable [`GraphNodeId`]; petgraph's own
//! indices stay internal. Loading follows MERGE semantics: an entity with an
//! existing id overwrites that node's fields, a relationship with an existing
//! `(from, to, type)` triple overwrites that edge's context.

use crate::error::{GraphError, GraphResult};
use crate::graph::GraphReader;
use crate::records::{Entity, Relationship, StructuredData};
use crate::types::{GraphNodeId, NeighborEdge, NodeFields, TextualNode};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct NodeData {
    id: GraphNodeId,
    name: String,
    description: String,
    node_type: String,
    /// Insertion sequence; listing order survives slot reuse after removals.
    seq: u64,
}

#[derive(Debug, Clone)]
struct EdgeData {
    relation: String,
    context: String,
    seq: u64,
}

#[derive(Default)]
struct GraphInner {
    graph: StableDiGraph<NodeData, EdgeData>,
    index: HashMap<GraphNodeId, NodeIndex>,
    next_seq: u64,
}

impl GraphInner {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Summary of a [`InMemoryGraph::load`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Entities created or updated.
    pub nodes_merged: usize,
    /// Relationships created or updated.
    pub edges_merged: usize,
    /// Entities dropped because their id was blank.
    pub entities_skipped: usize,
    /// Relationships dropped because an endpoint does not exist.
    pub edges_skipped: usize,
}

/// Thread-safe in-memory knowledge graph.
///
/// # Example
///
/// ```rust
/// use kgrag_core::prelude::*;
///
/// let graph = InMemoryGraph::new();
/// graph.upsert_entity(&Entity::new("1", "India").with_description("A country in South Asia.")).unwrap();
/// graph.upsert_entity(&Entity::new("2", "Pandemic")).unwrap();
/// graph.upsert_relationship(&Relationship::new("1", "2", "affected_by")).unwrap();
///
/// let nodes = graph.list_textual_nodes().unwrap();
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(nodes[0].display_text(), Some("A country in South Asia."));
/// ```
#[derive(Default)]
pub struct InMemoryGraph {
    inner: RwLock<GraphInner>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a batch of records.
    pub fn from_records(data: &StructuredData) -> GraphResult<Self> {
        let graph = Self::new();
        graph.load(data)?;
        Ok(graph)
    }

    fn read(&self) -> GraphResult<RwLockReadGuard<'_, GraphInner>> {
        self.inner
            .read()
            .map_err(|e| GraphError::Unavailable(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> GraphResult<RwLockWriteGuard<'_, GraphInner>> {
        self.inner
            .write()
            .map_err(|e| GraphError::Unavailable(format!("Failed to acquire write lock: {}", e)))
    }

    /// Create or update a node keyed by the entity id.
    pub fn upsert_entity(&self, entity: &Entity) -> GraphResult<GraphNodeId> {
        let id = GraphNodeId::new(entity.id.clone());
        let mut inner = self.write()?;

        if let Some(&idx) = inner.index.get(&id) {
            let node = &mut inner.graph[idx];
            node.name = entity.name.clone();
            node.description = entity.description.clone();
            node.node_type = entity.entity_type.clone();
        } else {
            let seq = inner.next_seq();
            let idx = inner.graph.add_node(NodeData {
                id: id.clone(),
                name: entity.name.clone(),
                description: entity.description.clone(),
                node_type: entity.entity_type.clone(),
                seq,
            });
            inner.index.insert(id.clone(), idx);
        }

        Ok(id)
    }

    /// Create or update the edge `(from, to, type)`.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if either endpoint is missing.
    pub fn upsert_relationship(&self, rel: &Relationship) -> GraphResult<()> {
        let mut inner = self.write()?;

        let from = *inner
            .index
            .get(&GraphNodeId::from(rel.from.as_str()))
            .ok_or_else(|| GraphError::NodeNotFound(rel.from.clone()))?;
        let to = *inner
            .index
            .get(&GraphNodeId::from(rel.to.as_str()))
            .ok_or_else(|| GraphError::NodeNotFound(rel.to.clone()))?;

        let existing = inner
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|e| e.target() == to && e.weight().relation == rel.relation_type)
            .map(|e| e.id());

        match existing {
            Some(edge) => inner.graph[edge].context = rel.context.clone(),
            None => {
                let seq = inner.next_seq();
                inner.graph.add_edge(
                    from,
                    to,
                    EdgeData {
                        relation: rel.relation_type.clone(),
                        context: rel.context.clone(),
                        seq,
                    },
                );
            }
        }

        Ok(())
    }

    /// Load a batch of records: all entities first, then relationships.
    pub fn load(&self, data: &StructuredData) -> GraphResult<LoadReport> {
        let mut report = LoadReport::default();

        for entity in &data.entities {
            if entity.id.trim().is_empty() {
                report.entities_skipped += 1;
                continue;
            }
            self.upsert_entity(entity)?;
            report.nodes_merged += 1;
        }

        for rel in &data.relationships {
            match self.upsert_relationship(rel) {
                Ok(()) => report.edges_merged += 1,
                Err(GraphError::NodeNotFound(_)) => report.edges_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Remove a node and all its edges. Returns whether the node existed.
    pub fn remove_node(&self, id: &GraphNodeId) -> GraphResult<bool> {
        let mut inner = self.write()?;
        match inner.index.remove(id) {
            Some(idx) => {
                inner.graph.remove_node(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete every node and edge.
    pub fn clear(&self) -> GraphResult<()> {
        let mut inner = self.write()?;
        *inner = GraphInner::default();
        Ok(())
    }

    pub fn edge_count(&self) -> GraphResult<usize> {
        Ok(self.read()?.graph.edge_count())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl GraphReader for InMemoryGraph {
    fn list_textual_nodes(&self) -> GraphResult<Vec<TextualNode>> {
        let inner = self.read()?;
        let mut nodes: Vec<&NodeData> = inner
            .graph
            .node_indices()
            .map(|idx| &inner.graph[idx])
            .collect();
        nodes.sort_by_key(|n| n.seq);

        Ok(nodes
            .into_iter()
            .map(|n| TextualNode {
                id: n.id.clone(),
                name: non_empty(&n.name),
                description: non_empty(&n.description),
            })
            .collect())
    }

    fn get_node(&self, id: &GraphNodeId) -> GraphResult<Option<NodeFields>> {
        let inner = self.read()?;
        Ok(inner.index.get(id).map(|&idx| {
            let node = &inner.graph[idx];
            NodeFields {
                name: non_empty(&node.name),
                description: non_empty(&node.description),
                node_type: non_empty(&node.node_type),
            }
        }))
    }

    fn neighbors(&self, id: &GraphNodeId) -> GraphResult<Vec<NeighborEdge>> {
        let inner = self.read()?;
        let Some(&idx) = inner.index.get(id) else {
            return Ok(Vec::new());
        };

        let mut edges: Vec<(u64, NeighborEdge)> = inner
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| {
                let data = e.weight();
                let target = &inner.graph[e.target()];
                (
                    data.seq,
                    NeighborEdge::new(&data.relation, &target.name, &data.context),
                )
            })
            .collect();
        edges.sort_by_key(|(seq, _)| *seq);

        Ok(edges.into_iter().map(|(_, edge)| edge).collect())
    }

    fn node_count(&self) -> GraphResult<usize> {
        Ok(self.read()?.graph.node_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economy() -> StructuredData {
        StructuredData {
            entities: vec![
                Entity::new("1", "India")
                    .with_type("Country")
                    .with_description("A country in South Asia."),
                Entity::new("2", "Pandemic").with_type("Event"),
                Entity::new("3", "Inflation"),
            ],
            relationships: vec![
                Relationship::new("1", "2", "affected_by")
                    .with_context("Economic impact due to the pandemic"),
                Relationship::new("1", "3", "experienced"),
            ],
        }
    }

    #[test]
    fn load_merges_nodes_and_edges() {
        let graph = InMemoryGraph::new();
        let report = graph.load(&economy()).unwrap();

        assert_eq!(report.nodes_merged, 3);
        assert_eq!(report.edges_merged, 2);
        assert_eq!(graph.node_count().unwrap(), 3);
        assert_eq!(graph.edge_count().unwrap(), 2);
    }

    #[test]
    fn reloading_same_records_is_a_merge() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        graph.load(&economy()).unwrap();

        assert_eq!(graph.node_count().unwrap(), 3);
        assert_eq!(graph.edge_count().unwrap(), 2);
    }

    #[test]
    fn entity_upsert_overwrites_fields() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        graph
            .upsert_entity(&Entity::new("2", "COVID-19 pandemic").with_description("Outbreak"))
            .unwrap();

        let fields = graph.get_node(&GraphNodeId::new("2")).unwrap().unwrap();
        assert_eq!(fields.name.as_deref(), Some("COVID-19 pandemic"));
        assert_eq!(fields.description.as_deref(), Some("Outbreak"));
        assert_eq!(fields.node_type, None);
    }

    #[test]
    fn relationship_with_missing_endpoint_is_skipped() {
        let mut data = economy();
        data.relationships.push(Relationship::new("1", "99", "mentions"));
        data.entities.push(Entity::new(" ", "Blank id"));

        let graph = InMemoryGraph::new();
        let report = graph.load(&data).unwrap();
        assert_eq!(report.edges_skipped, 1);
        assert_eq!(report.entities_skipped, 1);
        assert_eq!(graph.edge_count().unwrap(), 2);
    }

    #[test]
    fn neighbors_keep_insertion_order() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        let edges = graph.neighbors(&GraphNodeId::new("1")).unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].relation, "affected_by");
        assert_eq!(edges[0].target_name, "Pandemic");
        assert_eq!(edges[0].context, "Economic impact due to the pandemic");
        assert_eq!(edges[1].relation, "experienced");
        assert_eq!(edges[1].context, "");
    }

    #[test]
    fn edge_merge_updates_context_in_place() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        graph
            .upsert_relationship(
                &Relationship::new("1", "2", "affected_by").with_context("GDP contracted"),
            )
            .unwrap();

        let edges = graph.neighbors(&GraphNodeId::new("1")).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].context, "GDP contracted");
    }

    #[test]
    fn removed_node_disappears_with_its_edges() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        assert!(graph.remove_node(&GraphNodeId::new("2")).unwrap());
        assert!(!graph.remove_node(&GraphNodeId::new("2")).unwrap());

        assert!(graph.get_node(&GraphNodeId::new("2")).unwrap().is_none());
        assert_eq!(graph.neighbors(&GraphNodeId::new("1")).unwrap().len(), 1);
        assert!(graph.neighbors(&GraphNodeId::new("2")).unwrap().is_empty());
    }

    #[test]
    fn listing_order_survives_slot_reuse() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        graph.remove_node(&GraphNodeId::new("1")).unwrap();
        graph.upsert_entity(&Entity::new("4", "GDP")).unwrap();

        let ids: Vec<String> = graph
            .list_textual_nodes()
            .unwrap()
            .into_iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[test]
    fn clear_empties_the_store() {
        let graph = InMemoryGraph::from_records(&economy()).unwrap();
        graph.clear().unwrap();
        assert_eq!(graph.node_count().unwrap(), 0);
        assert!(graph.list_textual_nodes().unwrap().is_empty());
    }
}
