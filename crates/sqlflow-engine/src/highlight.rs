//! Hover highlight plans

use serde::{Deserialize, Serialize};
use sqlflow_core::{ColumnRef, StyleConfig};
use sqlflow_graph::Graph;

/// Styling to apply to one column and the connectors leaving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightOp {
    pub column: ColumnRef,

    /// Column row element id
    pub element_id: String,

    /// Element id of the column list holding the row
    pub columns_id: String,

    /// Endpoints whose source is this element get restyled
    pub endpoint_source: String,

    pub connector_stroke: String,

    pub column_background: String,
}

/// Ops for one hover enter or leave, in active-set order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightPlan {
    pub highlighted: bool,
    pub ops: Vec<HighlightOp>,
}

impl HighlightPlan {
    /// Turn an active set into styling ops
    ///
    /// Repeated columns produce repeated, identical ops. Columns whose node is
    /// not loaded still get an op, addressed by their parent name.
    pub fn for_active_set(graph: &Graph, active: &[ColumnRef], highlighted: bool, style: &StyleConfig) -> Self {
        let ops = active
            .iter()
            .map(|column| {
                let key = column.key();
                let container = graph
                    .node(&column.parent_name)
                    .map(|n| n.id.as_str())
                    .unwrap_or(column.parent_name.as_str());

                HighlightOp {
                    column: column.clone(),
                    element_id: key.clone(),
                    columns_id: format!("{}-cols", container),
                    endpoint_source: key,
                    connector_stroke: style.connector_stroke(highlighted).to_string(),
                    column_background: style.column_fill(highlighted).to_string(),
                }
            })
            .collect();

        Self { highlighted, ops }
    }

    /// Plan for hovering `(parent_name, column)`
    pub fn for_hover(graph: &Graph, parent_name: &str, column: &str, highlighted: bool, style: &StyleConfig) -> Self {
        let active = graph.active_set(parent_name, column);
        Self::for_active_set(graph, &active, highlighted, style)
    }
}
