// src/graph/cycles.rs
//! Cycle detection over parent-of edges.
//!
//! A person who is their own ancestor means the file is corrupt. Detection is
//! a depth-first search with an explicit stack so deep pedigrees cannot
//! overflow the call stack.

use super::Graph;
use crate::error::{GedcomError, Result};
use crate::gedcom::Xref;
use std::collections::{HashMap, HashSet};

/// Fails with `GedcomError::Cycle` if any individual descends from themselves.
///
/// # Errors
/// Returns `GedcomError::Cycle` naming an individual on the cycle.
pub fn check(graph: &Graph) -> Result<()> {
    match find_cycle(graph) {
        Some(id) => Err(GedcomError::Cycle {
            id: id.to_string(),
        }),
        None => Ok(()),
    }
}

/// First individual found closing a parent-of cycle, in declaration order.
#[must_use]
pub fn find_cycle(graph: &Graph) -> Option<Xref> {
    let adjacency = parent_edges(graph);
    let mut state = DfsState::default();

    for start in graph.individuals().iter().map(|i| &i.id) {
        if state.visited.contains(start) {
            continue;
        }
        if let Some(id) = dfs(start, &adjacency, &mut state) {
            return Some(id.clone());
        }
    }
    None
}

/// Parent to children, with children in family order.
fn parent_edges(graph: &Graph) -> HashMap<&Xref, Vec<&Xref>> {
    let mut adjacency: HashMap<&Xref, Vec<&Xref>> = HashMap::new();
    for family in graph.families() {
        for parent in family.spouses() {
            adjacency
                .entry(parent)
                .or_default()
                .extend(family.children.iter());
        }
    }
    adjacency
}

#[derive(Default)]
struct DfsState<'g> {
    visited: HashSet<&'g Xref>,
    on_path: HashSet<&'g Xref>,
}

fn dfs<'g>(
    start: &'g Xref,
    adjacency: &HashMap<&'g Xref, Vec<&'g Xref>>,
    state: &mut DfsState<'g>,
) -> Option<&'g Xref> {
    // (node, index of the next child to visit)
    let mut stack: Vec<(&Xref, usize)> = vec![(start, 0)];
    state.visited.insert(start);
    state.on_path.insert(start);

    while let Some(frame) = stack.last_mut() {
        let (node, next) = *frame;
        let child = adjacency.get(node).and_then(|children| children.get(next));
        let Some(&child) = child else {
            state.on_path.remove(node);
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if state.on_path.contains(child) {
            return Some(child);
        }
        if state.visited.insert(child) {
            state.on_path.insert(child);
            stack.push((child, 0));
        }
    }
    None
}
