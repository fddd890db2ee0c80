//! Render plan: what the drawing layer has to put on screen
//!
//! The plan is plain data. Element ids follow the conventions the hover
//! handlers rely on: a column row is identified by its column key, and
//! connector endpoints by `{column key}-{Left|Right}`. Column keys use the
//! node name, never the node id, because relations address nodes by name.

use serde::{Deserialize, Serialize};
use sqlflow_core::{column_key, ArrowStyle, NodeKind, StyleConfig};
use sqlflow_graph::Graph;

/// Node id that never originates connections, whatever its kind
const RESULT_NODE_ID: &str = "RS";

/// Side of a column row an endpoint is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Left,
    Right,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// Anchors a node of this kind gets on every column
    ///
    /// Sources only emit, results only receive, everything in between does both.
    pub fn for_kind(kind: NodeKind) -> &'static [Anchor] {
        match kind {
            NodeKind::Origin => &[Anchor::Right],
            NodeKind::Middle | NodeKind::Union => &[Anchor::Left, Anchor::Right],
            NodeKind::ResultSet => &[Anchor::Left],
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Endpoint uuid for a column key and side
pub fn endpoint_uuid(key: &str, anchor: Anchor) -> String {
    format!("{}-{}", key, anchor)
}

/// One column row inside a node box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnElement {
    /// Element id, equal to the column key
    pub element_id: String,

    /// Text shown in the row
    pub label: String,
}

/// A node box and its column rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBox {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub top: f64,
    pub left: f64,

    /// Element id of the title bar
    pub header_id: String,

    /// Element id of the column list
    pub columns_id: String,

    /// Rows in display order
    pub columns: Vec<ColumnElement>,
}

/// Dot drawn for an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointPaint {
    pub radius: f64,
    pub outline_color: String,
    pub outline_width: f64,
}

impl EndpointPaint {
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            radius: style.endpoint_radius,
            outline_color: style.endpoint_outline_color.clone(),
            outline_width: style.endpoint_outline_width,
        }
    }
}

/// Line and arrow drawn for a connector at rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorPaint {
    pub stroke: String,
    pub width: f64,

    /// Line width while the pointer is over the connector
    pub hover_width: f64,

    pub arrow: ArrowStyle,
}

impl ConnectorPaint {
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            stroke: style.connector_stroke(false).to_string(),
            width: style.connector_width,
            hover_width: style.connector_hover_width,
            arrow: style.arrow.clone(),
        }
    }
}

/// A connector endpoint on a column row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub uuid: String,

    /// Column row the endpoint is attached to
    pub element_id: String,

    pub anchor: Anchor,

    pub paint: EndpointPaint,
}

/// A connector between two endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source_uuid: String,
    pub target_uuid: String,

    /// Index of the relation this connector draws
    pub relation: usize,

    pub paint: ConnectorPaint,
}

/// Everything the drawing layer needs for one graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub nodes: Vec<NodeBox>,
    pub endpoints: Vec<Endpoint>,
    pub connections: Vec<Connection>,
}

impl RenderPlan {
    /// Lay out boxes, endpoints and connectors for a graph
    ///
    /// Connectors start from the columns of every node except result sets, in
    /// node, column, then relation order. A relation whose target is not
    /// loaded still gets a connector; the drawing layer decides what to do
    /// with an endpoint it cannot find.
    pub fn build(graph: &Graph, style: &StyleConfig) -> Self {
        let mut plan = Self::default();
        let endpoint_paint = EndpointPaint::from_style(style);
        let connector_paint = ConnectorPaint::from_style(style);

        for node in graph.nodes() {
            let columns = node
                .columns
                .iter()
                .map(|c| ColumnElement {
                    element_id: column_key(&node.name, &c.id),
                    label: c.name.clone(),
                })
                .collect::<Vec<_>>();

            for column in &columns {
                for &anchor in Anchor::for_kind(node.kind) {
                    plan.endpoints.push(Endpoint {
                        uuid: endpoint_uuid(&column.element_id, anchor),
                        element_id: column.element_id.clone(),
                        anchor,
                        paint: endpoint_paint.clone(),
                    });
                }
            }

            plan.nodes.push(NodeBox {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                top: node.top,
                left: node.left,
                header_id: format!("{}-heading", node.id),
                columns_id: format!("{}-cols", node.id),
                columns,
            });
        }

        for node in graph.nodes() {
            if node.kind == NodeKind::ResultSet || node.id == RESULT_NODE_ID {
                continue;
            }

            for column in &node.columns {
                let key = column_key(&node.name, &column.id);

                for (index, relation) in graph.relations().iter().enumerate() {
                    if relation.source.key() == key {
                        plan.connections.push(Connection {
                            source_uuid: endpoint_uuid(&key, Anchor::Right),
                            target_uuid: endpoint_uuid(&relation.target.key(), Anchor::Left),
                            relation: index,
                            paint: connector_paint.clone(),
                        });
                    }
                }
            }
        }

        tracing::debug!(
            nodes = plan.nodes.len(),
            endpoints = plan.endpoints.len(),
            connections = plan.connections.len(),
            "built render plan"
        );

        plan
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Connectors whose source or target endpoint is not in the plan
    pub fn unresolved_connections(&self) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| {
                !self.endpoints.iter().any(|e| e.uuid == c.source_uuid)
                    || !self.endpoints.iter().any(|e| e.uuid == c.target_uuid)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlflow_core::{Column, Node, Relation};
    use sqlflow_graph::load_graph;

    fn node(name: &str, kind: NodeKind, columns: &[&str]) -> Node {
        Node::new(name, name, kind).with_columns(columns.iter().map(|c| Column::new(*c, *c)).collect())
    }

    fn uuids(plan: &RenderPlan) -> Vec<&str> {
        plan.endpoints.iter().map(|e| e.uuid.as_str()).collect()
    }

    #[test]
    fn anchors_depend_on_kind() {
        let graph = load_graph(
            vec![
                node("src", NodeKind::Origin, &["a"]),
                node("mid", NodeKind::Middle, &["a"]),
                node("uni", NodeKind::Union, &["a"]),
                node("out", NodeKind::ResultSet, &["a"]),
            ],
            Vec::new(),
        );
        let plan = RenderPlan::build(&graph, &StyleConfig::default());

        assert_eq!(
            uuids(&plan),
            vec!["src.a-Right", "mid.a-Left", "mid.a-Right", "uni.a-Left", "uni.a-Right", "out.a-Left"]
        );
    }

    #[test]
    fn node_boxes_carry_element_ids() {
        let graph = load_graph(
            vec![Node::new("n1", "orders", NodeKind::Origin)
                .with_position(50.0, 150.0)
                .with_columns(vec![Column::new("id", "order id")])],
            Vec::new(),
        );
        let plan = RenderPlan::build(&graph, &StyleConfig::default());
        let node = &plan.nodes[0];

        assert_eq!(node.header_id, "n1-heading");
        assert_eq!(node.columns_id, "n1-cols");
        assert_eq!(
            node.columns,
            vec![ColumnElement {
                element_id: "orders.id".to_string(),
                label: "order id".to_string()
            }]
        );
        assert_eq!((node.top, node.left), (50.0, 150.0));
    }

    #[test]
    fn connections_follow_node_column_relation_order() {
        let graph = load_graph(
            vec![
                node("a", NodeKind::Origin, &["x", "y"]),
                node("m", NodeKind::Middle, &["x"]),
                node("r", NodeKind::ResultSet, &["x"]),
            ],
            vec![
                Relation::between("m", "x", "r", "x"),
                Relation::between("a", "y", "m", "x"),
                Relation::between("a", "x", "m", "x"),
            ],
        );
        let plan = RenderPlan::build(&graph, &StyleConfig::default());

        let drawn: Vec<(usize, &str, &str)> = plan
            .connections
            .iter()
            .map(|c| (c.relation, c.source_uuid.as_str(), c.target_uuid.as_str()))
            .collect();
        assert_eq!(
            drawn,
            vec![
                (2, "a.x-Right", "m.x-Left"),
                (1, "a.y-Right", "m.x-Left"),
                (0, "m.x-Right", "r.x-Left"),
            ]
        );
        assert!(plan.unresolved_connections().is_empty());
    }

    #[test]
    fn endpoint_uuids_use_node_name_not_id() {
        let graph = load_graph(
            vec![
                Node::new("n1", "orders", NodeKind::Origin).with_columns(vec![Column::new("id", "id")]),
                Node::new("n2", "report", NodeKind::ResultSet).with_columns(vec![Column::new("id", "id")]),
            ],
            vec![Relation::between("orders", "id", "report", "id")],
        );
        let plan = RenderPlan::build(&graph, &StyleConfig::default());

        assert_eq!(uuids(&plan), vec!["orders.id-Right", "report.id-Left"]);
        assert_eq!(plan.connections[0].source_uuid, "orders.id-Right");
        assert_eq!(plan.connections[0].target_uuid, "report.id-Left");
        assert!(plan.unresolved_connections().is_empty());
    }

    #[test]
    fn style_reaches_endpoints_and_connectors() {
        let style = StyleConfig {
            connector_color: "gray".to_string(),
            connector_width: 1.5,
            connector_hover_width: 4.0,
            endpoint_radius: 3.0,
            endpoint_outline_color: "blue".to_string(),
            endpoint_outline_width: 1.0,
            arrow: ArrowStyle {
                width: 8.0,
                length: 9.0,
                location: 0.5,
            },
            ..StyleConfig::default()
        };
        let graph = load_graph(
            vec![node("a", NodeKind::Origin, &["x"]), node("r", NodeKind::ResultSet, &["x"])],
            vec![Relation::between("a", "x", "r", "x")],
        );
        let plan = RenderPlan::build(&graph, &style);

        assert!(plan.endpoints.iter().all(|e| e.paint
            == EndpointPaint {
                radius: 3.0,
                outline_color: "blue".to_string(),
                outline_width: 1.0,
            }));
        assert_eq!(
            plan.connections[0].paint,
            ConnectorPaint {
                stroke: "gray".to_string(),
                width: 1.5,
                hover_width: 4.0,
                arrow: ArrowStyle {
                    width: 8.0,
                    length: 9.0,
                    location: 0.5,
                },
            }
        );
    }

    #[test]
    fn default_style_paint() {
        let graph = load_graph(
            vec![node("a", NodeKind::Origin, &["x"]), node("r", NodeKind::ResultSet, &["x"])],
            vec![Relation::between("a", "x", "r", "x")],
        );
        let plan = RenderPlan::build(&graph, &StyleConfig::default());
        let connector = &plan.connections[0].paint;

        assert_eq!(connector.stroke, "#c4c4c4");
        assert_eq!((connector.width, connector.hover_width), (2.0, 3.0));
        assert_eq!(connector.arrow, ArrowStyle::default());
        assert_eq!(plan.endpoints[0].paint.outline_color, "red");
        assert_eq!(plan.endpoints[0].paint.radius, 2.0);
    }

    #[test]
    fn result_sets_never_originate_connections() {
        let graph = load_graph(
            vec![
                node("r", NodeKind::ResultSet, &["x"]),
                node("RS", NodeKind::Middle, &["x"]),
                node("m", NodeKind::Middle, &["x"]),
            ],
            vec![
                Relation::between("r", "x", "m", "x"),
                Relation::between("RS", "x", "m", "x"),
            ],
        );
        assert!(RenderPlan::build(&graph, &StyleConfig::default()).connections.is_empty());
    }

    #[test]
    fn dangling_targets_are_planned_but_unresolved() {
        let graph = load_graph(
            vec![node("a", NodeKind::Origin, &["x"])],
            vec![
                Relation::between("a", "x", "ghost", "x"),
                Relation::between("ghost", "x", "a", "x"),
            ],
        );
        let plan = RenderPlan::build(&graph, &StyleConfig::default());

        assert_eq!(plan.connections.len(), 1);
        assert_eq!(plan.unresolved_connections()[0].target_uuid, "ghost.x-Left");
    }

    #[test]
    fn plan_serializes_kinds_by_wire_name() {
        let graph = load_graph(vec![node("out", NodeKind::ResultSet, &["x"])], Vec::new());
        let json = RenderPlan::build(&graph, &StyleConfig::default()).to_json().unwrap();
        assert!(json.contains("\"kind\": \"RS\""));
        assert!(json.contains("\"anchor\": \"Left\""));
    }
}
