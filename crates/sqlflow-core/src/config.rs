//! Configuration schema (sqlflow.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::diagnostic::{DiagnosticCode, Severity};

/// Arrow overlay drawn at the target end of a connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    pub width: f64,
    pub length: f64,
    /// Position along the connector, 0.0 (source) to 1.0 (target)
    pub location: f64,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            width: 10.0,
            length: 13.0,
            location: 1.0,
        }
    }
}

/// Colors and sizes handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Connector stroke at rest
    pub connector_color: String,

    /// Connector stroke while part of the active set
    pub connector_highlight_color: String,

    /// Connector line width at rest
    pub connector_width: f64,

    /// Connector line width under the pointer
    pub connector_hover_width: f64,

    /// Column row background at rest
    pub column_background: String,

    /// Column row background while part of the active set
    pub column_highlight_background: String,

    /// Endpoint dot radius
    pub endpoint_radius: f64,

    /// Endpoint outline color
    pub endpoint_outline_color: String,

    /// Endpoint outline width
    pub endpoint_outline_width: f64,

    /// Arrow overlay
    pub arrow: ArrowStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            connector_color: "#c4c4c4".to_string(),
            connector_highlight_color: "black".to_string(),
            connector_width: 2.0,
            connector_hover_width: 3.0,
            column_background: "#fff".to_string(),
            column_highlight_background: "#faebd7".to_string(),
            endpoint_radius: 2.0,
            endpoint_outline_color: "red".to_string(),
            endpoint_outline_width: 2.0,
            arrow: ArrowStyle::default(),
        }
    }
}

impl StyleConfig {
    /// Connector stroke for the given highlight state
    pub fn connector_stroke(&self, highlighted: bool) -> &str {
        if highlighted {
            &self.connector_highlight_color
        } else {
            &self.connector_color
        }
    }

    /// Column background for the given highlight state
    pub fn column_fill(&self, highlighted: bool) -> &str {
        if highlighted {
            &self.column_highlight_background
        } else {
            &self.column_background
        }
    }
}

/// Placement of nodes built from lineage-service responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical distance between input rows
    pub row_spacing: f64,

    /// Top of the first input row
    pub first_row_top: f64,

    /// Left edge of the input column
    pub origin_left: f64,

    /// Left edge of the result node
    pub result_left: f64,

    /// Subtracted from the centered result row position
    pub result_top_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_spacing: 155.0,
            first_row_top: 50.0,
            origin_left: 150.0,
            result_left: 550.0,
            result_top_offset: 100.0,
        }
    }
}

/// Severity threshold overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Configured severity for a code, or the code's default
    pub fn get_severity(&self, code: DiagnosticCode) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or_else(|| code.default_severity())
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Allowlist rules for known-incomplete data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Node names whose dangling references are not reported; `*` matches any
    /// run of characters and may appear more than once
    #[serde(default)]
    pub ignore_dangling: Vec<String>,
}

impl AllowlistRules {
    fn matches_pattern(name: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }

    /// Check if dangling references to this node name are allowed
    pub fn is_dangling_allowed(&self, node_name: &str) -> bool {
        Self::matches_pattern(node_name, &self.ignore_dangling)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rendering style
    #[serde(default)]
    pub style: StyleConfig,

    /// Service import layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Glob matching where each `*` matches any run of characters
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();

    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let middle: Vec<&str> = parts.collect();
    let Some((last, between)) = middle.split_last() else {
        // No `*` at all
        return rest.is_empty();
    };

    for part in between {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
