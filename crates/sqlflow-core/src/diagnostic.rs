//! Diagnostic codes and data-quality reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Relation references (1xxx)
    /// A relation endpoint names a node that is not loaded
    RelationDanglingNode,

    /// A relation endpoint names a column its node does not have
    RelationDanglingColumn,

    // Identity (2xxx)
    /// A node name or column id contains the key separator
    KeySeparatorInName,

    /// Two columns produce the same column key
    DuplicateColumnKey,

    /// Two nodes share one id
    DuplicateNodeId,

    // Shape (3xxx)
    /// Node has no columns
    EmptyNode,

    /// Relations form a cycle
    LineageCycle,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelationDanglingNode => "RELATION_DANGLING_NODE",
            Self::RelationDanglingColumn => "RELATION_DANGLING_COLUMN",
            Self::KeySeparatorInName => "KEY_SEPARATOR_IN_NAME",
            Self::DuplicateColumnKey => "DUPLICATE_COLUMN_KEY",
            Self::DuplicateNodeId => "DUPLICATE_NODE_ID",
            Self::EmptyNode => "EMPTY_NODE",
            Self::LineageCycle => "LINEAGE_CYCLE",
        }
    }

    /// Severity used when no override is configured
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DuplicateColumnKey | Self::DuplicateNodeId => Severity::Error,
            Self::RelationDanglingNode
            | Self::RelationDanglingColumn
            | Self::KeySeparatorInName => Severity::Warn,
            Self::EmptyNode | Self::LineageCycle => Severity::Info,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in a lineage document a diagnostic points
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Node name (or id for id-level findings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Column id within the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Index into the relation list (0-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<usize>,
}

impl Location {
    /// Location of a node
    pub fn node(node: impl Into<String>) -> Self {
        Self {
            node: Some(node.into()),
            ..Self::default()
        }
    }

    /// Location of a column
    pub fn column(node: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            node: Some(node.into()),
            column: Some(column.into()),
            relation: None,
        }
    }

    /// Location of a relation by index
    pub fn relation(index: usize) -> Self {
        Self {
            relation: Some(index),
            ..Self::default()
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        match (&self.node, &self.column) {
            (Some(node), Some(column)) => parts.push(format!("{}.{}", node, column)),
            (Some(node), None) => parts.push(node.clone()),
            _ => {}
        }
        if let Some(index) = self.relation {
            parts.push(format!("relations[{}]", index));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Where the finding was made
    pub location: Option<Location>,

    /// Column keys related to the finding (e.g. the members of a cycle)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            related: Vec::new(),
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set related column keys
    pub fn with_related(mut self, related: Vec<String>) -> Self {
        self.related = related;
        self
    }
}
