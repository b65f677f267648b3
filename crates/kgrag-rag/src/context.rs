//! One-hop neighbourhood context for a matched node.

use crate::error::RagResult;
use kgrag_core::{GraphNodeId, GraphReader, NeighborEdge};
use serde::Serialize;
use std::fmt::Write;

/// A node's own text plus its direct outgoing relationships.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodContext {
    pub node_id: GraphNodeId,
    pub name: String,
    pub description: String,
    /// Outgoing edges in the reader's order.
    pub relationships: Vec<NeighborEdge>,
}

impl NeighborhoodContext {
    /// Serialize into the text handed to the answer generator.
    ///
    /// ```text
    /// Description: Paris is the capital of France
    /// Name: Paris
    /// Relationships: capital_of -> France (seat of government); located_on -> Seine
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Description: {}", self.description);
        let _ = writeln!(out, "Name: {}", self.name);
        out.push_str("Relationships: ");

        if self.relationships.is_empty() {
            out.push_str("none");
            return out;
        }

        for (i, edge) in self.relationships.iter().enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            let _ = write!(out, "{} -> {}", edge.relation, edge.target_name);
            if !edge.context.is_empty() {
                let _ = write!(out, " ({})", edge.context);
            }
        }
        out
    }
}

/// Builds [`NeighborhoodContext`]s from a graph reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborhoodContextBuilder;

impl NeighborhoodContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Returns `Ok(None)` when the node has been deleted since indexing.
    pub fn build(
        &self,
        node_id: &GraphNodeId,
        reader: &dyn GraphReader,
    ) -> RagResult<Option<NeighborhoodContext>> {
        let Some(fields) = reader.get_node(node_id)? else {
            return Ok(None);
        };
        let relationships = reader.neighbors(node_id)?;

        Ok(Some(NeighborhoodContext {
            node_id: node_id.clone(),
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            relationships,
        }))
    }
}
