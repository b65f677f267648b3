//! Shared types used across the retrieval engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, store-stable identifier for a node in the knowledge graph.
///
/// Identifiers come from the graph store's own key (the entity id of the
/// extraction records), never from an internal storage position, so they
/// stay valid for the lifetime of a build even if the store reorganises.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphNodeId(String);

impl GraphNodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GraphNodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GraphNodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A node as listed for indexing: its id plus the fields text can be derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextualNode {
    pub id: GraphNodeId,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl TextualNode {
    pub fn new(id: impl Into<GraphNodeId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Text used to embed this node: the description when it is non-blank,
    /// otherwise the name. `None` when neither carries any text.
    pub fn display_text(&self) -> Option<&str> {
        non_blank(self.description.as_deref()).or_else(|| non_blank(self.name.as_deref()))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// The text-bearing fields of a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub node_type: Option<String>,
}

/// One outgoing edge of a node, flattened for context building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborEdge {
    /// Relationship type label (e.g. `affected_by`).
    pub relation: String,
    /// Name of the target node (empty if the target has no name).
    pub target_name: String,
    /// Free-text context carried by the edge (empty if absent).
    pub context: String,
}

impl NeighborEdge {
    pub fn new(
        relation: impl Into<String>,
        target_name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            relation: relation.into(),
            target_name: target_name.into(),
            context: context.into(),
        }
    }
}
