// src/graph/query.rs
//! Generation-bounded ancestor and descendant queries.
//!
//! Traversal is breadth-first. An individual is reported in the first
//! generation that reaches them and never again; the subject is never
//! reported at all.

use super::types::{Generations, Individual};
use super::Graph;
use crate::error::{GedcomError, Result};
use crate::gedcom::Xref;
use std::collections::HashSet;

/// Largest generation count a query accepts.
pub const MAX_GENERATIONS: i64 = 10_000;

/// First individual in declaration order with exactly this name.
///
/// # Errors
/// Returns `GedcomError::NotFound` when nobody matches.
pub fn find_person<'g>(graph: &'g Graph, given: &str, surname: &str) -> Result<&'g Individual> {
    graph
        .individuals()
        .iter()
        .find(|i| i.is_named(given, surname))
        .ok_or_else(|| GedcomError::NotFound {
            given: given.to_string(),
            surname: surname.to_string(),
        })
}

/// Up to `n` generations of descendants of the named individual.
///
/// # Errors
/// `NotFound` for an unknown name, `InvalidArgument` for a negative or oversized `n`.
pub fn descendants(graph: &Graph, given: &str, surname: &str, n: i64) -> Result<Generations> {
    let depth = generation_count(n)?;
    let start = find_person(graph, given, surname)?;
    Ok(walk(graph, &start.id, depth, children_of))
}

/// Up to `n` generations of ancestors of the named individual.
///
/// # Errors
/// `NotFound` for an unknown name, `InvalidArgument` for a negative or oversized `n`.
pub fn ancestors(graph: &Graph, given: &str, surname: &str, n: i64) -> Result<Generations> {
    let depth = generation_count(n)?;
    let start = find_person(graph, given, surname)?;
    Ok(walk(graph, &start.id, depth, parents_of))
}

/// Every descendant of `id`, nearest first, without generation bound.
#[must_use]
pub fn all_descendants(graph: &Graph, id: &Xref) -> Vec<Xref> {
    let mut seen: HashSet<Xref> = HashSet::from([id.clone()]);
    let mut found = Vec::new();
    let mut frontier = vec![id.clone()];

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for person in &frontier {
            for child in children_of(graph, person) {
                if seen.insert(child.clone()) {
                    next.push(child);
                }
            }
        }
        found.extend(next.iter().cloned());
        frontier = next;
    }
    found
}

fn generation_count(n: i64) -> Result<usize> {
    if n < 0 {
        return Err(GedcomError::InvalidArgument(format!(
            "generation count must not be negative, got {n}"
        )));
    }
    if n > MAX_GENERATIONS {
        return Err(GedcomError::InvalidArgument(format!(
            "generation count {n} exceeds the limit of {MAX_GENERATIONS}"
        )));
    }
    usize::try_from(n).map_err(|_| GedcomError::InvalidArgument(format!("bad generation count {n}")))
}

fn walk<F>(graph: &Graph, start: &Xref, depth: usize, step: F) -> Generations
where
    F: Fn(&Graph, &Xref) -> Vec<Xref>,
{
    let mut seen: HashSet<Xref> = HashSet::from([start.clone()]);
    let mut frontier = vec![start.clone()];
    let mut generations = Vec::with_capacity(depth);

    for _ in 0..depth {
        let mut next = Vec::new();
        for person in &frontier {
            for relative in step(graph, person) {
                if seen.insert(relative.clone()) {
                    next.push(relative);
                }
            }
        }
        generations.push(
            next.iter()
                .filter_map(|id| graph.individual(id))
                .map(Individual::name)
                .collect(),
        );
        frontier = next;
    }
    generations
}

/// Children of every family `id` is a spouse in, in `spouse_of` then family order.
fn children_of(graph: &Graph, id: &Xref) -> Vec<Xref> {
    graph
        .individual(id)
        .map(|person| {
            person
                .spouse_of
                .iter()
                .filter_map(|fam| graph.family(fam))
                .flat_map(|fam| fam.children.iter().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Husband then wife of the family `id` is a child of.
fn parents_of(graph: &Graph, id: &Xref) -> Vec<Xref> {
    graph
        .individual(id)
        .and_then(|person| person.child_of.as_ref())
        .and_then(|fam| graph.family(fam))
        .map(|fam| fam.spouses().cloned().collect())
        .unwrap_or_default()
}
