//! sqlflow engine - what the diagram does with a loaded graph
//!
//! This crate implements:
//! - Data-quality validation of lineage documents
//! - The render plan handed to the drawing layer
//! - Hover highlight plans
//! - The diagram session that owns the drawing surface

pub mod validation;
pub mod render_plan;
pub mod highlight;
pub mod session;

pub use validation::Validation;
pub use render_plan::{Anchor, ColumnElement, Connection, ConnectorPaint, Endpoint, EndpointPaint, NodeBox, RenderPlan};
pub use highlight::{HighlightOp, HighlightPlan};
pub use session::{DiagramSession, RenderSurface};
