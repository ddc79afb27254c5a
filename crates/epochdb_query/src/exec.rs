//! Query execution: index selection, filtering, join, binding, projection.

use crate::compile::{compile_query, PredicateClause};
use crate::error::{QueryError, QueryResult};
use crate::term::Query;
use epochdb_core::{Index, Item, Permutation, Snapshot};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// One result row: `(variable, component)` pairs for a single join-variable
/// value. Pair order follows EAV order per contributing clause, not the
/// `find` order.
pub type Row = Vec<(String, Item)>;

/// A filtered index path emitted by stage two: a level-1 key, a level-2
/// key, the surviving leaf items, and the clause's variable names permuted
/// into index level order.
struct ResultPath {
    l1: Item,
    l2: Item,
    items: BTreeSet<Item>,
    vars: [Option<String>; 3],
}

/// Runs a query against a snapshot.
///
/// Execution has four stages: pick the index from the join variable's EAV
/// position, filter each clause down the chosen index, join leaf items by
/// how many clauses they answer, then bind variables and project onto the
/// `find` list. Rows come back ordered by join-variable value.
pub fn q(snap: &Snapshot, query: &Query) -> QueryResult<Vec<Row>> {
    let clauses = compile_query(query)?;
    let position = join_position(&clauses)?;
    let perm = index_for_position(position);
    debug!(?perm, position, clauses = clauses.len(), "selected index");

    let index = snap.index(perm);
    let clause_paths: Vec<Vec<ResultPath>> = clauses
        .iter()
        .map(|pc| filter_clause(index, pc, perm))
        .collect();

    let kept = joining_items(&clause_paths);

    let find: HashSet<&str> = query.find.iter().map(String::as_str).collect();
    let mut rows: BTreeMap<Item, Row> = BTreeMap::new();
    for paths in &clause_paths {
        for path in paths {
            for item in path.items.intersection(&kept) {
                let row = rows.entry(item.clone()).or_default();
                let (e, a, v) = perm.invert(
                    (path.vars[0].as_ref(), &path.l1),
                    (path.vars[1].as_ref(), &path.l2),
                    (path.vars[2].as_ref(), item),
                );
                for (var, component) in [e, a, v] {
                    let Some(var) = var else { continue };
                    if find.contains(var.as_str()) && !row.iter().any(|(name, _)| name == var) {
                        row.push((var.clone(), component.clone()));
                    }
                }
            }
        }
    }
    Ok(rows.into_values().collect())
}

/// Stage one: the join variable's EAV position, and from it the index.
///
/// Column `i` survives iff every clause binds the same variable name at
/// position `i`. The first surviving column wins; a query where none
/// survives has no join variable and is rejected.
fn join_position(clauses: &[PredicateClause]) -> QueryResult<usize> {
    if clauses.is_empty() {
        return Err(QueryError::unsupported("query has no clauses"));
    }
    'column: for position in 0..3 {
        let mut shared: Option<&str> = None;
        for clause in clauses {
            match clause.vars[position].as_deref() {
                Some(var) => match shared {
                    None => shared = Some(var),
                    Some(name) if name == var => {}
                    Some(_) => continue 'column,
                },
                None => continue 'column,
            }
        }
        if shared.is_some() {
            return Ok(position);
        }
    }
    Err(QueryError::unsupported(
        "no variable appears at the same position in every clause",
    ))
}

/// Maps a join position onto the index that stores that component at its
/// leaf level, so leaves can be intersected across clauses.
fn index_for_position(position: usize) -> Permutation {
    match position {
        0 => Permutation::Avet,
        1 => Permutation::Veat,
        _ => Permutation::Eavt,
    }
}

/// Stage two: walk one clause down the index.
fn filter_clause(index: &Index, clause: &PredicateClause, perm: Permutation) -> Vec<ResultPath> {
    let (p1, p2, p3) = perm.apply(&clause.preds[0], &clause.preds[1], &clause.preds[2]);
    let (v1, v2, v3) = perm.apply(
        clause.vars[0].clone(),
        clause.vars[1].clone(),
        clause.vars[2].clone(),
    );

    let mut paths = Vec::new();
    for (l1, inner) in index.levels() {
        if !(**p1)(l1) {
            continue;
        }
        for (l2, leaf) in inner {
            if !(**p2)(l2) {
                continue;
            }
            let items: BTreeSet<Item> = leaf.iter().filter(|item| (**p3)(item)).cloned().collect();
            if items.is_empty() {
                continue;
            }
            paths.push(ResultPath {
                l1: l1.clone(),
                l2: l2.clone(),
                items,
                vars: [v1.clone(), v2.clone(), v3.clone()],
            });
        }
    }
    paths
}

/// Stage three: keep the leaf items that answer every clause.
fn joining_items(clause_paths: &[Vec<ResultPath>]) -> BTreeSet<Item> {
    let mut counts: BTreeMap<&Item, usize> = BTreeMap::new();
    for paths in clause_paths {
        let mut seen: BTreeSet<&Item> = BTreeSet::new();
        for path in paths {
            seen.extend(path.items.iter());
        }
        for item in seen {
            *counts.entry(item).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n == clause_paths.len())
        .map(|(item, _)| item.clone())
        .collect()
}
