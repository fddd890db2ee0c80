//! Data-quality checks for a loaded lineage graph
//!
//! Nothing here changes how the graph is walked. Dangling references stay
//! legal; this pass only reports them (and the other sharp edges of
//! string-keyed identity) so data problems upstream can be spotted.

use std::collections::HashMap;

use sqlflow_core::{
    column_key, ColumnRef, Config, Diagnostic, DiagnosticCode, Location, Report, KEY_SEPARATOR,
};
use sqlflow_graph::Graph;

/// Result of validating one graph
#[derive(Debug, Clone)]
pub struct Validation {
    /// Diagnostics in discovery order: nodes, relations, cycles
    pub diagnostics: Vec<Diagnostic>,

    /// Number of nodes checked
    pub nodes_checked: usize,

    /// Number of relations checked
    pub relations_checked: usize,
}

impl Validation {
    /// Run every check against the graph
    pub fn run(graph: &Graph, config: &Config) -> Self {
        let mut validation = Self {
            diagnostics: Vec::new(),
            nodes_checked: graph.nodes().len(),
            relations_checked: graph.relations().len(),
        };

        validation.check_nodes(graph, config);
        validation.check_relations(graph, config);
        validation.check_cycles(graph, config);

        tracing::debug!(
            diagnostics = validation.diagnostics.len(),
            "validated lineage graph"
        );

        validation
    }

    fn push(&mut self, config: &Config, code: DiagnosticCode, message: String, location: Location) -> &mut Diagnostic {
        let severity = config.severity.get_severity(code);
        self.diagnostics
            .push(Diagnostic::new(code, severity, message).with_location(location));
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    fn check_nodes(&mut self, graph: &Graph, config: &Config) {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut keys: HashMap<String, String> = HashMap::new();

        for node in graph.nodes() {
            *ids.entry(node.id.as_str()).or_insert(0) += 1;
            if ids[node.id.as_str()] == 2 {
                self.push(
                    config,
                    DiagnosticCode::DuplicateNodeId,
                    format!("Node id '{}' is used by more than one node", node.id),
                    Location::node(&node.id),
                );
            }

            if node.name.contains(KEY_SEPARATOR) {
                self.push(
                    config,
                    DiagnosticCode::KeySeparatorInName,
                    format!(
                        "Node name '{}' contains '{}'; its column keys may collide",
                        node.name, KEY_SEPARATOR
                    ),
                    Location::node(&node.name),
                );
            }

            if node.columns.is_empty() {
                self.push(
                    config,
                    DiagnosticCode::EmptyNode,
                    format!("Node '{}' has no columns", node.name),
                    Location::node(&node.name),
                );
            }

            for column in &node.columns {
                if column.id.contains(KEY_SEPARATOR) {
                    self.push(
                        config,
                        DiagnosticCode::KeySeparatorInName,
                        format!(
                            "Column id '{}' of node '{}' contains '{}'; its key may collide",
                            column.id, node.name, KEY_SEPARATOR
                        ),
                        Location::column(&node.name, &column.id),
                    );
                }

                let key = column_key(&node.name, &column.id);
                let owner = format!("{}/{}", node.id, column.id);
                if let Some(first) = keys.get(&key) {
                    let related = vec![first.clone(), owner];
                    self.push(
                        config,
                        DiagnosticCode::DuplicateColumnKey,
                        format!("Column key '{}' is produced by more than one column", key),
                        Location::column(&node.name, &column.id),
                    )
                    .related = related;
                } else {
                    keys.insert(key, owner);
                }
            }
        }
    }

    fn check_relations(&mut self, graph: &Graph, config: &Config) {
        for (index, relation) in graph.relations().iter().enumerate() {
            self.check_endpoint(graph, config, index, "source", &relation.source);
            self.check_endpoint(graph, config, index, "target", &relation.target);
        }
    }

    fn check_endpoint(&mut self, graph: &Graph, config: &Config, index: usize, end: &str, endpoint: &ColumnRef) {
        if config.allowlist.is_dangling_allowed(&endpoint.parent_name) {
            return;
        }

        match graph.node(&endpoint.parent_name) {
            None => {
                self.push(
                    config,
                    DiagnosticCode::RelationDanglingNode,
                    format!(
                        "Relation {} '{}' names node '{}', which is not loaded",
                        end, endpoint, endpoint.parent_name
                    ),
                    Location::relation(index),
                );
            }
            Some(node) if node.find_column(&endpoint.column).is_none() => {
                self.push(
                    config,
                    DiagnosticCode::RelationDanglingColumn,
                    format!(
                        "Relation {} '{}' names column '{}', which node '{}' does not have",
                        end, endpoint, endpoint.column, node.name
                    ),
                    Location::relation(index),
                );
            }
            Some(_) => {}
        }
    }

    fn check_cycles(&mut self, graph: &Graph, config: &Config) {
        if let Some(order) = graph.topological_order() {
            tracing::trace!(columns = order.len(), "relations are acyclic");
            return;
        }

        let cyclic = graph.cyclic_keys();

        let severity = config.severity.get_severity(DiagnosticCode::LineageCycle);
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::LineageCycle,
                severity,
                format!("Relations form a cycle through {} columns", cyclic.len()),
            )
            .with_related(cyclic),
        );
    }

    /// Check if any diagnostic is an error
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == sqlflow_core::Severity::Error)
    }

    /// Diagnostics with the given code
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    /// Build a versioned report
    pub fn into_report(self) -> Report {
        Report::from_diagnostics(self.diagnostics)
            .with_counts(self.nodes_checked, self.relations_checked)
    }
}
