//! Lineage graph loading and traversal
//!
//! This crate handles:
//! - Parsing lineage documents (`data.json`)
//! - Importing lineage-service responses into documents
//! - Building the immutable column graph
//! - Upstream/downstream reachability for hover highlighting

pub mod document;
pub mod service;
pub mod graph;
pub mod reachability;

pub use document::{LineageDocument, LoadError};
pub use service::{LineageResponse, EntityRef, import_response, SERVICE_COLUMN_ID};
pub use graph::{Graph, load_graph};
pub use reachability::{find_descendants, find_ancestors, find_active_set, dedup_active_set};
pub use sqlflow_core::{column_key, ColumnRef, Relation, Node, NodeKind, Column};
