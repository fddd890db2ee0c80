//! Validation report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, Severity};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of diagnostics
    pub total: usize,

    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Number of info messages
    pub info: usize,

    /// Number of nodes checked
    pub nodes_checked: usize,

    /// Number of relations checked
    pub relations_checked: usize,
}

/// Validation report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Create a report from diagnostics
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let mut report = Self::new();
        for diagnostic in diagnostics {
            report.add_diagnostic(diagnostic);
        }
        report
    }

    /// Record how much of the document was checked
    pub fn with_counts(mut self, nodes_checked: usize, relations_checked: usize) -> Self {
        self.summary.nodes_checked = nodes_checked;
        self.summary.relations_checked = relations_checked;
        self
    }

    /// Add a diagnostic to the report
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warn => self.summary.warnings += 1,
            Severity::Info => self.summary.info += 1,
        }

        self.summary.total += 1;
        self.diagnostics.push(diagnostic);
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ReportError> {
        let json = self.to_json()
            .map_err(|e| ReportError::SerializeError(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| ReportError::IoError(path.display().to_string(), e.to_string()))
    }

    /// Render as Markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Lineage Validation Report\n\n");
        md.push_str(&format!("**Version:** {}\n\n", self.version));
        md.push_str(&format!("**Timestamp:** {}\n\n", self.timestamp));

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- Nodes checked: {}\n", self.summary.nodes_checked));
        md.push_str(&format!("- Relations checked: {}\n", self.summary.relations_checked));
        md.push_str(&format!("- Total diagnostics: {}\n", self.summary.total));
        md.push_str(&format!("- Errors: {}\n", self.summary.errors));
        md.push_str(&format!("- Warnings: {}\n", self.summary.warnings));
        md.push_str(&format!("- Info: {}\n", self.summary.info));
        md.push('\n');

        if self.diagnostics.is_empty() {
            md.push_str("**No issues found.**\n");
            return md;
        }

        md.push_str("## Diagnostics\n\n");
        for diag in &self.diagnostics {
            md.push_str(&format!("### {} - {}\n\n", diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(loc) = &diag.location {
                md.push_str(&format!("**Location:** `{}`\n\n", loc));
            }

            if !diag.related.is_empty() {
                md.push_str("**Related columns:**\n\n");
                for key in &diag.related {
                    md.push_str(&format!("- `{}`\n", key));
                }
                md.push('\n');
            }
        }

        md
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Report output errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report {0}: {1}")]
    IoError(String, String),

    #[error("Failed to serialize report: {0}")]
    SerializeError(String),
}
