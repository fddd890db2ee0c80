//! Lineage-service response import
//!
//! The lineage service describes one result entity and the entities it was
//! computed from. Each becomes a single-column node; each input gets one
//! relation into the result.
//!
//! The service spells its description field `descripton`. That spelling is
//! part of the wire format and doubles as the column id of every imported
//! node.

use serde::{Deserialize, Serialize};
use sqlflow_core::{Column, LayoutConfig, Node, NodeKind, Relation, KEY_SEPARATOR};

use crate::document::{LineageDocument, LoadError};

/// Column id given to every node built from a service response
pub const SERVICE_COLUMN_ID: &str = "descripton";

/// An entity as reported by the lineage service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Qualified name such as `db.orders`
    #[serde(default)]
    pub name: Option<String>,

    /// Free-text description
    #[serde(default, rename = "descripton", alias = "description")]
    pub description: Option<String>,
}

impl EntityRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name with every separator removed, so it can serve as a key namespace
    pub fn flat_name(&self) -> String {
        match &self.name {
            Some(name) => name.chars().filter(|c| *c != KEY_SEPARATOR).collect(),
            None => {
                tracing::warn!("lineage entity has no name; using an empty node name");
                String::new()
            }
        }
    }

    fn column(&self) -> Column {
        let label = self
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(SERVICE_COLUMN_ID);
        Column::new(SERVICE_COLUMN_ID, label)
    }
}

/// Lineage of one result entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageResponse {
    /// The result entity
    #[serde(default)]
    pub id: Option<EntityRef>,

    /// Entities the result was computed from, in service order
    #[serde(default)]
    pub inputs: Vec<EntityRef>,
}

impl LineageResponse {
    /// Parse a service payload
    ///
    /// Accepts either the full envelope (`{"data": {"graph": [{"data": ...}]}}`,
    /// first graph entry used) or the bare lineage object. Returns `None` when
    /// the payload carries no lineage.
    pub fn parse(json: &str) -> Result<Option<Self>, LoadError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| LoadError::ParseError(e.to_string()))?;

        let body = if value.get("data").is_some() {
            value.pointer("/data/graph/0/data").cloned().unwrap_or_default()
        } else {
            value
        };

        if body.is_null() {
            tracing::debug!("lineage payload carries no graph");
            return Ok(None);
        }

        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| LoadError::ParseError(e.to_string()))
    }

    /// Lay the response out as a lineage document
    ///
    /// Inputs stack vertically on the left as `Origin` nodes; the result sits
    /// on the right as an `RS` node centered against them.
    pub fn into_document(&self, layout: &LayoutConfig) -> LineageDocument {
        let result = self.id.clone().unwrap_or_default();
        let result_name = result.flat_name();

        let mut nodes = Vec::with_capacity(self.inputs.len() + 1);
        let mut relations = Vec::with_capacity(self.inputs.len());

        for (i, input) in self.inputs.iter().enumerate() {
            let name = input.flat_name();

            relations.push(Relation::between(
                name.clone(),
                SERVICE_COLUMN_ID,
                result_name.clone(),
                SERVICE_COLUMN_ID,
            ));

            nodes.push(
                Node::new(name.clone(), name, NodeKind::Origin)
                    .with_position(layout.first_row_top + layout.row_spacing * i as f64, layout.origin_left)
                    .with_columns(vec![input.column()]),
            );
        }

        let result_top = layout.row_spacing * ((self.inputs.len() + 1) as f64 / 2.0) - layout.result_top_offset;
        nodes.push(
            Node::new(result_name.clone(), result_name, NodeKind::ResultSet)
                .with_position(result_top, layout.result_left)
                .with_columns(vec![result.column()]),
        );

        tracing::debug!(inputs = self.inputs.len(), "imported lineage response");

        LineageDocument { nodes, relations }
    }
}

/// Parse a service payload and lay it out; an empty payload gives an empty document
pub fn import_response(json: &str, layout: &LayoutConfig) -> Result<LineageDocument, LoadError> {
    Ok(LineageResponse::parse(json)?
        .map(|response| response.into_document(layout))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response() -> LineageResponse {
        LineageResponse {
            id: Some(EntityRef::new("dw.report").with_description("monthly totals")),
            inputs: vec![
                EntityRef::new("db.orders").with_description("order facts"),
                EntityRef::new("db.customers"),
                EntityRef::new("db.refunds").with_description(""),
            ],
        }
    }

    #[test]
    fn flat_name_strips_separators() {
        assert_eq!(EntityRef::new("a.b.c").flat_name(), "abc");
        assert_eq!(EntityRef::default().flat_name(), "");
    }

    #[test]
    fn inputs_become_origin_nodes_stacked_vertically() {
        let doc = response().into_document(&LayoutConfig::default());

        let tops: Vec<f64> = doc.nodes.iter().take(3).map(|n| n.top).collect();
        assert_eq!(tops, vec![50.0, 205.0, 360.0]);
        assert!(doc.nodes.iter().take(3).all(|n| n.kind == NodeKind::Origin && n.left == 150.0));
        assert_eq!(doc.nodes[0].id, "dborders");
        assert_eq!(doc.nodes[0].columns[0], Column::new("descripton", "order facts"));
        // Missing and empty descriptions fall back to the column id
        assert_eq!(doc.nodes[1].columns[0].name, "descripton");
        assert_eq!(doc.nodes[2].columns[0].name, "descripton");
    }

    #[test]
    fn result_node_is_centered_on_the_right() {
        let doc = response().into_document(&LayoutConfig::default());
        let result = doc.nodes.last().unwrap();

        assert_eq!(result.kind, NodeKind::ResultSet);
        assert_eq!(result.name, "dwreport");
        assert_eq!(result.left, 550.0);
        // 155 * (4 / 2) - 100
        assert_eq!(result.top, 210.0);
    }

    #[test]
    fn result_position_uses_real_division() {
        let response = LineageResponse {
            id: Some(EntityRef::new("r")),
            inputs: vec![EntityRef::new("a"), EntityRef::new("b")],
        };
        let doc = response.into_document(&LayoutConfig::default());
        // 155 * 1.5 - 100
        assert_eq!(doc.nodes.last().unwrap().top, 132.5);
    }

    #[test]
    fn one_relation_per_input() {
        let doc = response().into_document(&LayoutConfig::default());
        assert_eq!(
            doc.relations[1],
            Relation::between("dbcustomers", "descripton", "dwreport", "descripton")
        );
        assert_eq!(doc.relations.len(), 3);
    }

    #[test]
    fn parse_envelope_and_bare_payloads() {
        let envelope = r#"{"data": {"graph": [{"data": {
            "id": {"name": "dw.report"},
            "inputs": [{"name": "db.orders", "descripton": "facts"}]
        }}]}}"#;
        let parsed = LineageResponse::parse(envelope).unwrap().unwrap();
        assert_eq!(parsed.inputs[0].description.as_deref(), Some("facts"));

        let bare = r#"{"id": {"name": "r"}, "inputs": []}"#;
        assert!(LineageResponse::parse(bare).unwrap().is_some());
    }

    #[test]
    fn empty_envelope_imports_as_empty_document() {
        let doc = import_response(r#"{"data": {"graph": []}}"#, &LayoutConfig::default()).unwrap();
        assert_eq!(doc, LineageDocument::default());

        let doc = import_response("null", &LayoutConfig::default()).unwrap();
        assert!(doc.nodes.is_empty());
    }
}
