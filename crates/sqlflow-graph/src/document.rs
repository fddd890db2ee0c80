//! Lineage document parsing
//!
//! A lineage document is the `{ "nodes": [...], "relations": [...] }` JSON
//! the viewer loads at session start.

use serde::{Deserialize, Serialize};
use sqlflow_core::{Node, Relation};
use std::path::Path;

use crate::graph::{load_graph, Graph};

/// Nodes and relations of one diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageDocument {
    /// Table-like entities
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Column-to-column data flow
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl LineageDocument {
    /// Load a document from file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LoadError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse a document from a JSON string
    pub fn from_str(json: &str) -> Result<Self, LoadError> {
        let document: Self = serde_json::from_str(json)
            .map_err(|e| LoadError::ParseError(e.to_string()))?;

        tracing::debug!(
            nodes = document.nodes.len(),
            relations = document.relations.len(),
            "parsed lineage document"
        );

        Ok(document)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, LoadError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LoadError::SerializeError(e.to_string()))
    }

    /// Save to file as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), LoadError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)
            .map_err(|e| LoadError::IoError(path.display().to_string(), e.to_string()))
    }

    /// Build the immutable graph for a rendering session
    pub fn into_graph(self) -> Graph {
        load_graph(self.nodes, self.relations)
    }
}

/// Document load errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse lineage JSON: {0}")]
    ParseError(String),

    #[error("Failed to serialize lineage JSON: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlflow_core::NodeKind;

    const SMALL: &str = r#"{
        "nodes": [
            {"id": "orders", "name": "orders", "type": "Origin", "top": 50, "left": 150,
             "columns": [{"id": "id", "name": "order id"}]},
            {"id": "report", "name": "report", "type": "RS", "top": 50, "left": 550,
             "columns": [{"id": "total", "name": "total"}]}
        ],
        "relations": [
            {"source": {"parentName": "orders", "column": "id"},
             "target": {"parentName": "report", "column": "total"}}
        ]
    }"#;

    #[test]
    fn parse_document() {
        let doc = LineageDocument::from_str(SMALL).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[1].kind, NodeKind::ResultSet);
        assert_eq!(doc.relations[0].target.parent_name, "report");
    }

    #[test]
    fn numeric_column_ids_on_both_ends_of_a_relation() {
        let doc = LineageDocument::from_str(
            r#"{
                "nodes": [
                    {"id": "a", "name": "a", "type": "Origin", "top": 0,
                     "columns": [{"id": 1, "name": "one"}]},
                    {"id": "b", "name": "b", "type": "RS", "top": 0,
                     "columns": [{"id": 2, "name": "two"}]}
                ],
                "relations": [
                    {"source": {"parentName": "a", "column": 1},
                     "target": {"parentName": "b", "column": 2}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.relations[0].source.column, "1");
        assert_eq!(doc.relations[0].target.key(), "b.2");

        let graph = doc.into_graph();
        let upstream: Vec<String> = graph.descendants("b", "2").iter().map(|c| c.key()).collect();
        assert_eq!(upstream, vec!["b.2", "a.1"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let doc = LineageDocument::from_str("{}").unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.relations.is_empty());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = LineageDocument::from_str("{\"nodes\": [").unwrap_err();
        assert!(matches!(err, LoadError::ParseError(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LineageDocument::from_file(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(matches!(err, LoadError::IoError(..)));
    }

    #[test]
    fn into_graph_keeps_everything() {
        let graph = LineageDocument::from_str(SMALL).unwrap().into_graph();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.relations().len(), 1);
    }
}
