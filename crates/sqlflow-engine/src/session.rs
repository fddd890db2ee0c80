//! Diagram session: one drawing surface per attached view
//!
//! The surface is owned by the session. It is drawn on attach and released
//! exactly once, either by [`DiagramSession::detach`] or when the session is
//! dropped.

use sqlflow_core::{ColumnRef, StyleConfig};
use sqlflow_graph::Graph;

use crate::highlight::{HighlightOp, HighlightPlan};
use crate::render_plan::{Connection, Endpoint, NodeBox, RenderPlan};

/// The drawing layer a session renders into
pub trait RenderSurface {
    /// Draw a node box with its column rows
    fn draw_node(&mut self, node: &NodeBox);

    /// Attach a connector endpoint to a column row
    fn add_endpoint(&mut self, endpoint: &Endpoint);

    /// Draw a connector between two endpoints
    fn connect(&mut self, connection: &Connection);

    /// Restyle a column row and the connectors leaving it
    fn apply_highlight(&mut self, op: &HighlightOp);

    /// Remove every connector and endpoint and free the surface
    fn release(&mut self);
}

/// A rendered graph bound to its surface
pub struct DiagramSession<S: RenderSurface> {
    graph: Graph,
    plan: RenderPlan,
    style: StyleConfig,
    surface: Option<S>,
}

impl<S: RenderSurface> DiagramSession<S> {
    /// Draw the graph onto the surface and take ownership of it
    pub fn attach(mut surface: S, graph: Graph, style: StyleConfig) -> Self {
        let plan = RenderPlan::build(&graph, &style);

        for node in &plan.nodes {
            surface.draw_node(node);
        }
        for endpoint in &plan.endpoints {
            surface.add_endpoint(endpoint);
        }
        for connection in &plan.connections {
            surface.connect(connection);
        }

        tracing::debug!(nodes = plan.nodes.len(), "diagram session attached");

        Self {
            graph,
            plan,
            style,
            surface: Some(surface),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Pointer entered a column element; returns the number of ops applied
    pub fn hover_enter(&mut self, element_id: &str) -> usize {
        self.hover(element_id, true)
    }

    /// Pointer left a column element; returns the number of ops applied
    pub fn hover_leave(&mut self, element_id: &str) -> usize {
        self.hover(element_id, false)
    }

    fn hover(&mut self, element_id: &str, highlighted: bool) -> usize {
        let Some(column) = ColumnRef::parse_element_id(element_id) else {
            tracing::debug!(element_id, "hover target is not a column element");
            return 0;
        };

        let plan = HighlightPlan::for_hover(
            &self.graph,
            &column.parent_name,
            &column.column,
            highlighted,
            &self.style,
        );

        if let Some(surface) = self.surface.as_mut() {
            for op in &plan.ops {
                surface.apply_highlight(op);
            }
        }

        plan.ops.len()
    }

    /// Release the surface and hand it back
    ///
    /// Returns `None` only if the surface was already released.
    pub fn detach(mut self) -> Option<S> {
        match self.surface.take() {
            Some(mut surface) => {
                surface.release();
                tracing::debug!("diagram session detached");
                Some(surface)
            }
            None => {
                tracing::warn!("diagram session detached without a surface");
                None
            }
        }
    }
}

impl<S: RenderSurface> Drop for DiagramSession<S> {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            tracing::debug!("diagram session dropped");
        }
    }
}
