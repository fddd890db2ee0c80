//! sqlflow core
//!
//! Domain model for column-level lineage diagrams, plus the stable
//! diagnostic/report types and the `sqlflow.toml` configuration schema.
//! Never rename diagnostic codes - they are part of the public API.

pub mod model;
pub mod diagnostic;
pub mod report;
pub mod config;

pub use model::{Node, NodeKind, Column, ColumnRef, Relation, column_key, KEY_SEPARATOR};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use report::{Report, ReportError, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, StyleConfig, ArrowStyle, LayoutConfig, SeverityThreshold, AllowlistRules};
