//! Extraction records: the entities and relationships a document yields.
//!
//! This is the hand-off format between extraction and graph loading:
//!
//! ```json
//! {
//!   "entities": [
//!     { "id": "1", "name": "India", "type": "Country", "description": "A country in South Asia." }
//!   ],
//!   "relationships": [
//!     { "from": "1", "to": "2", "type": "affected_by", "context": "Economic impact due to the pandemic" }
//!   ]
//! }
//! ```
//!
//! Missing keys normalise to empty strings. Numeric ids are accepted and
//! converted to strings, since extraction models emit both.

use crate::error::GraphResult;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// An extracted entity, stored as a graph node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An extracted directed relationship between two entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub relation_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub context: String,
}

impl Relationship {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// A batch of extracted records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredData {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl StructuredData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse records from a JSON string.
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read records from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append another batch to this one.
    pub fn merge(&mut self, other: StructuredData) {
        self.entities.extend(other.entities);
        self.relationships.extend(other.relationships);
    }

    /// Prefix every entity id (and relationship endpoint) with `prefix`.
    ///
    /// Extraction models number entities per chunk ("1", "2", ...), so ids
    /// from different chunks collide unless namespaced before merging.
    /// Blank ids stay blank so loading still skips them.
    pub fn namespaced(mut self, prefix: &str) -> Self {
        for entity in &mut self.entities {
            entity.id = with_prefix(prefix, &entity.id);
        }
        for rel in &mut self.relationships {
            rel.from = with_prefix(prefix, &rel.from);
            rel.to = with_prefix(prefix, &rel.to);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }
}

fn with_prefix(prefix: &str, id: &str) -> String {
    if id.trim().is_empty() {
        id.to_string()
    } else {
        format!("{prefix}{id}")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_normalise_to_empty() {
        let data = StructuredData::from_json_str(
            r#"{"entities": [{"id": "1", "name": "India"}],
                "relationships": [{"from": "1", "to": "2"}]}"#,
        )
        .unwrap();

        assert_eq!(data.entities[0].description, "");
        assert_eq!(data.entities[0].entity_type, "");
        assert_eq!(data.relationships[0].relation_type, "");
        assert_eq!(data.relationships[0].context, "");
    }

    #[test]
    fn numeric_and_null_values_are_accepted() {
        let data = StructuredData::from_json_str(
            r#"{"entities": [{"id": 7, "name": "GDP", "description": null}]}"#,
        )
        .unwrap();

        assert_eq!(data.entities[0].id, "7");
        assert_eq!(data.entities[0].description, "");
        assert!(data.relationships.is_empty());
    }

    #[test]
    fn type_field_uses_wire_name() {
        let entity = Entity::new("1", "India").with_type("Country");
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "Country");
    }

    #[test]
    fn namespacing_rewrites_ids_and_endpoints() {
        let data = StructuredData {
            entities: vec![Entity::new("1", "India"), Entity::new("2", "Pandemic")],
            relationships: vec![Relationship::new("1", "2", "affected_by")],
        }
        .namespaced("c3-");

        assert_eq!(data.entities[0].id, "c3-1");
        assert_eq!(data.relationships[0].from, "c3-1");
        assert_eq!(data.relationships[0].to, "c3-2");
    }

    #[test]
    fn namespacing_keeps_blank_ids_blank() {
        let data = StructuredData::from_json_str(
            r#"{"entities": [{"name": "A"}, {"name": "B"}, {"id": "1", "name": "C"}],
                "relationships": [{"from": "", "to": "1"}]}"#,
        )
        .unwrap()
        .namespaced("c0-");

        assert_eq!(data.entities[0].id, "");
        assert_eq!(data.relationships[0].from, "");
        assert_eq!(data.relationships[0].to, "c0-1");

        use crate::{GraphReader, InMemoryGraph};
        let graph = InMemoryGraph::new();
        let report = graph.load(&data).unwrap();
        assert_eq!(report.nodes_merged, 1);
        assert_eq!(report.entities_skipped, 2);
        assert_eq!(report.edges_skipped, 1);
        assert_eq!(graph.node_count().unwrap(), 1);
    }

    #[test]
    fn merge_and_file_roundtrip() {
        let mut a = StructuredData {
            entities: vec![Entity::new("1", "India")],
            relationships: vec![],
        };
        a.merge(StructuredData {
            entities: vec![Entity::new("2", "Pandemic")],
            relationships: vec![Relationship::new("1", "2", "affected_by")],
        });
        assert_eq!(a.entities.len(), 2);
        assert_eq!(a.relationships.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structured_data.json");
        std::fs::write(&path, a.to_json_pretty().unwrap()).unwrap();
        assert_eq!(StructuredData::from_json_file(&path).unwrap(), a);
    }
}
