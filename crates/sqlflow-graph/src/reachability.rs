//! Hover reachability over relation lists
//!
//! Naming follows the lineage viewer: the *descendants* of a column are the
//! columns it was derived from (walk target → source), and its *ancestors*
//! are the columns derived from it (walk source → target).
//!
//! Each walk is a depth-first preorder over edges in input order. A visited
//! set keyed by column key bounds every walk, so cyclic relation lists
//! terminate and each column is reported at most once per walk.

use std::collections::HashSet;

use sqlflow_core::{ColumnRef, Relation};

/// Depth-first preorder from `start`, following `next`, each key visited once
pub(crate) fn walk<'a, F, I>(start: ColumnRef, mut next: F) -> Vec<ColumnRef>
where
    F: FnMut(&ColumnRef) -> I,
    I: Iterator<Item = &'a ColumnRef>,
{
    let mut visited = HashSet::new();
    let mut result = Vec::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if !visited.insert(current.key()) {
            tracing::trace!(column = %current, "skipping revisited column");
            continue;
        }

        // Reverse so the first matching edge is explored first
        let neighbors: Vec<ColumnRef> = next(&current).cloned().collect();
        stack.extend(neighbors.into_iter().rev());
        result.push(current);
    }

    result
}

/// The column, then everything it was derived from, recursively
///
/// For every relation whose target is the current column, continues from
/// that relation's source. Relations naming unknown columns simply never
/// match.
pub fn find_descendants(relations: &[Relation], parent_name: &str, column: &str) -> Vec<ColumnRef> {
    walk(ColumnRef::new(parent_name, column), |current| {
        let current = current.clone();
        relations
            .iter()
            .filter(move |r| r.target == current)
            .map(|r| &r.source)
    })
}

/// The column, then everything derived from it, recursively
pub fn find_ancestors(relations: &[Relation], parent_name: &str, column: &str) -> Vec<ColumnRef> {
    walk(ColumnRef::new(parent_name, column), |current| {
        let current = current.clone();
        relations
            .iter()
            .filter(move |r| r.source == current)
            .map(|r| &r.target)
    })
}

/// Descendants followed by ancestors
///
/// Not deduplicated: the starting column appears once in each half, and a
/// column can appear in both halves when the graph is cyclic. Highlighting
/// the same column twice is harmless.
pub fn find_active_set(relations: &[Relation], parent_name: &str, column: &str) -> Vec<ColumnRef> {
    let mut active = find_descendants(relations, parent_name, column);
    active.extend(find_ancestors(relations, parent_name, column));
    active
}

/// Drop repeated columns, keeping first occurrences in order
pub fn dedup_active_set(active: Vec<ColumnRef>) -> Vec<ColumnRef> {
    let mut seen = HashSet::new();
    active.into_iter().filter(|c| seen.insert(c.key())).collect()
}
