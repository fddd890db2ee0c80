//! Column graph construction and lookups
//!
//! Nodes live in one owned collection. Relations keep their endpoints as
//! string pairs and are indexed by column key in both directions, so a
//! lookup for an absent node or column is an empty result, never an error.

use std::collections::{HashMap, HashSet, VecDeque};

use sqlflow_core::{column_key, Column, ColumnRef, Node, Relation};

use crate::reachability;

/// Immutable lineage graph for one rendering session
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,

    relations: Vec<Relation>,

    /// Node name -> index into `nodes` (first occurrence wins)
    by_name: HashMap<String, usize>,

    /// Column key -> indices of relations whose target is that column
    incoming: HashMap<String, Vec<usize>>,

    /// Column key -> indices of relations whose source is that column
    outgoing: HashMap<String, Vec<usize>>,
}

/// Build the graph from its two input collections
///
/// Never fails: nodes without columns and relations pointing at absent nodes
/// are kept as they are.
pub fn load_graph(nodes: Vec<Node>, relations: Vec<Relation>) -> Graph {
    let mut by_name = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        by_name.entry(node.name.clone()).or_insert(i);
    }

    let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
    let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, relation) in relations.iter().enumerate() {
        incoming.entry(relation.target.key()).or_default().push(i);
        outgoing.entry(relation.source.key()).or_default().push(i);
    }

    tracing::debug!(nodes = nodes.len(), relations = relations.len(), "loaded lineage graph");

    Graph {
        nodes,
        relations,
        by_name,
        incoming,
        outgoing,
    }
}

impl Graph {
    /// All nodes in input order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All relations in input order
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|&i| &self.nodes[i])
    }

    /// Look up a node by id
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up the column an endpoint refers to
    pub fn column(&self, endpoint: &ColumnRef) -> Option<&Column> {
        self.node(&endpoint.parent_name)?.find_column(&endpoint.column)
    }

    /// Whether an endpoint resolves to a loaded column
    pub fn contains(&self, endpoint: &ColumnRef) -> bool {
        self.column(endpoint).is_some()
    }

    /// Keys of every loaded column, in node then column order
    pub fn column_keys(&self) -> Vec<String> {
        self.nodes.iter().flat_map(|n| n.column_keys()).collect()
    }

    /// Immediate sources feeding `(parent_name, column)`
    pub fn sources_of(&self, parent_name: &str, column: &str) -> Vec<&ColumnRef> {
        self.relations_into(&column_key(parent_name, column))
            .map(|r| &r.source)
            .collect()
    }

    /// Immediate targets fed by `(parent_name, column)`
    pub fn targets_of(&self, parent_name: &str, column: &str) -> Vec<&ColumnRef> {
        self.relations_from(&column_key(parent_name, column))
            .map(|r| &r.target)
            .collect()
    }

    /// Relations whose target has this key, in input order
    pub(crate) fn relations_into<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Relation> + 'a {
        self.incoming
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.relations[i])
    }

    /// Relations whose source has this key, in input order
    pub(crate) fn relations_from<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Relation> + 'a {
        self.outgoing
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.relations[i])
    }

    /// Upstream lineage of a column, starting with the column itself
    ///
    /// Same result as [`reachability::find_descendants`] over
    /// [`Graph::relations`], using the key index instead of a scan.
    pub fn descendants(&self, parent_name: &str, column: &str) -> Vec<ColumnRef> {
        reachability::walk(ColumnRef::new(parent_name, column), |current| {
            self.relations_into(&current.key()).map(|r| &r.source)
        })
    }

    /// Downstream lineage of a column, starting with the column itself
    pub fn ancestors(&self, parent_name: &str, column: &str) -> Vec<ColumnRef> {
        reachability::walk(ColumnRef::new(parent_name, column), |current| {
            self.relations_from(&current.key()).map(|r| &r.target)
        })
    }

    /// Everything highlighted together with a column: descendants then ancestors
    pub fn active_set(&self, parent_name: &str, column: &str) -> Vec<ColumnRef> {
        let mut active = self.descendants(parent_name, column);
        active.extend(self.ancestors(parent_name, column));
        active
    }

    /// Column keys in topological order, or `None` when relations form a cycle
    pub fn topological_order(&self) -> Option<Vec<String>> {
        let keys = self.relation_keys();
        let mut in_degree: HashMap<&str, usize> = keys.iter().map(|k| (k.as_str(), 0)).collect();
        for relation in &self.relations {
            if let Some(degree) = in_degree.get_mut(relation.target.key().as_str()) {
                *degree += 1;
            }
        }

        // Kahn's algorithm, seeded in first-seen order for a stable result
        let mut queue: VecDeque<&str> = keys
            .iter()
            .map(String::as_str)
            .filter(|k| in_degree[k] == 0)
            .collect();
        let mut result = Vec::with_capacity(keys.len());

        while let Some(key) = queue.pop_front() {
            result.push(key.to_string());

            for relation in self.relations_from(key) {
                let target = relation.target.key();
                if let Some(degree) = in_degree.get_mut(target.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        if let Some(k) = keys.iter().find(|k| **k == target) {
                            queue.push_back(k.as_str());
                        }
                    }
                }
            }
        }

        if result.len() == keys.len() {
            Some(result)
        } else {
            None
        }
    }

    /// Keys of columns that lie on a cycle (or on a path between cycles), sorted
    ///
    /// Repeatedly strips columns with no remaining incoming edges, then columns
    /// with no remaining outgoing edges; whatever survives is cyclic.
    pub fn cyclic_keys(&self) -> Vec<String> {
        let mut alive: HashSet<String> = self.relation_keys().into_iter().collect();

        loop {
            let mut has_in: HashSet<String> = HashSet::new();
            let mut has_out: HashSet<String> = HashSet::new();
            for relation in &self.relations {
                let (source, target) = (relation.source.key(), relation.target.key());
                if alive.contains(&source) && alive.contains(&target) {
                    has_out.insert(source);
                    has_in.insert(target);
                }
            }

            let before = alive.len();
            alive.retain(|k| has_in.contains(k) && has_out.contains(k));
            if alive.len() == before {
                break;
            }
        }

        let mut keys: Vec<String> = alive.into_iter().collect();
        keys.sort();
        keys
    }

    /// Every key that appears as a relation endpoint, in first-seen order
    fn relation_keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for relation in &self.relations {
            for key in [relation.source.key(), relation.target.key()] {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}
