//! Lineage domain types
//!
//! Nodes are table-like boxes holding ordered columns. Relations connect
//! columns by value: each endpoint is a `(parentName, column)` string pair,
//! never a pointer into the node collection, so an endpoint may name a node
//! or column that is not loaded.

use serde::{Deserialize, Deserializer, Serialize};

/// Separator between node name and column id in a column key
pub const KEY_SEPARATOR: char = '.';

/// Canonical identity of a column: `{parent_name}.{column}`
///
/// Names containing [`KEY_SEPARATOR`] can collide (`a.b` + `c` and `a` +
/// `b.c` both give `a.b.c`). Callers own that constraint.
pub fn column_key(parent_name: &str, column: &str) -> String {
    let mut key = String::with_capacity(parent_name.len() + column.len() + 1);
    key.push_str(parent_name);
    key.push(KEY_SEPARATOR);
    key.push_str(column);
    key
}

/// Rendering style of a node
///
/// Has no effect on traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Source table
    Origin,

    /// Intermediate result
    Middle,

    /// Union of several inputs
    #[serde(rename = "UNION", alias = "Union")]
    Union,

    /// Final result set
    #[serde(rename = "RS", alias = "ResultSet")]
    ResultSet,
}

impl NodeKind {
    /// Wire name used in lineage documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Origin => "Origin",
            Self::Middle => "Middle",
            Self::Union => "UNION",
            Self::ResultSet => "RS",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column id, unique within its node (numbers in JSON are accepted)
    #[serde(deserialize_with = "deserialize_column_id")]
    pub id: String,

    /// Display name
    pub name: String,
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn deserialize_column_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(i) => i.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// A table-like entity in the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: String,

    /// Display name, also the key namespace of its columns
    pub name: String,

    /// Rendering style
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Vertical position in pixels
    #[serde(default)]
    pub top: f64,

    /// Horizontal position in pixels
    #[serde(default)]
    pub left: f64,

    /// Columns in display order
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Node {
    /// Create a node positioned at the origin with no columns
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            top: 0.0,
            left: 0.0,
            columns: Vec::new(),
        }
    }

    /// Set position
    pub fn with_position(mut self, top: f64, left: f64) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    /// Set columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Find a column by id
    pub fn find_column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Column keys in display order
    pub fn column_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| column_key(&self.name, &c.id))
            .collect()
    }
}

/// One end of a relation: a column addressed by node name and column id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    /// Name of the owning node
    pub parent_name: String,

    /// Column id (numbers in JSON are accepted, as for [`Column::id`])
    #[serde(deserialize_with = "deserialize_column_id")]
    pub column: String,
}

impl ColumnRef {
    pub fn new(parent_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            parent_name: parent_name.into(),
            column: column.into(),
        }
    }

    /// Column key of this endpoint
    pub fn key(&self) -> String {
        column_key(&self.parent_name, &self.column)
    }

    /// Whether this endpoint addresses `(parent_name, column)`
    pub fn is(&self, parent_name: &str, column: &str) -> bool {
        self.parent_name == parent_name && self.column == column
    }

    /// Parse a rendered column element id such as `orders.id`
    ///
    /// Takes the first two separator-delimited parts; anything after them is
    /// ignored. Returns `None` when there are fewer than two parts.
    pub fn parse_element_id(element_id: &str) -> Option<Self> {
        let mut parts = element_id.split(KEY_SEPARATOR);
        let parent_name = parts.next()?;
        let column = parts.next()?;
        Some(Self::new(parent_name, column))
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.parent_name, KEY_SEPARATOR, self.column)
    }
}

/// Directed data-flow edge `source -> target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Column the data comes from
    pub source: ColumnRef,

    /// Column the data flows into
    pub target: ColumnRef,
}

impl Relation {
    pub fn new(source: ColumnRef, target: ColumnRef) -> Self {
        Self { source, target }
    }

    /// Shorthand for `Relation::new(ColumnRef::new(..), ColumnRef::new(..))`
    pub fn between(
        source_parent: impl Into<String>,
        source_column: impl Into<String>,
        target_parent: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            source: ColumnRef::new(source_parent, source_column),
            target: ColumnRef::new(target_parent, target_column),
        }
    }
}
