//! Traversal of the reference graph between entities.

use crate::datom::Item;
use crate::entity::{Entity, EntityId};
use crate::index::Permutation;
use crate::snapshot::Snapshot;
use crate::value::Value;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Visit order for the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Breadth-first.
    Bfs,
    /// Depth-first.
    Dfs,
}

/// Which reference edges to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// References held by the visited entity, read from its `Ref`-typed
    /// attributes.
    Outgoing,
    /// References pointing at the visited entity, read from the `VEAT`
    /// index. Only indexed reference attributes produce incoming edges.
    Incoming,
}

/// Starts a walk over the reference graph rooted at `root`.
///
/// The walk is lazy: entities are produced as the iterator is driven.
/// A visited set guards against cycles, so each reachable entity is
/// yielded exactly once; references to ids absent from storage are
/// skipped. Every call builds a fresh, restartable walk.
pub fn traverse_db(
    root: &EntityId,
    snap: Arc<Snapshot>,
    strategy: Strategy,
    direction: Direction,
) -> Traversal {
    let mut pending = VecDeque::new();
    pending.push_back(root.clone());
    let mut visited = HashSet::new();
    visited.insert(root.clone());
    Traversal {
        snap,
        strategy,
        direction,
        pending,
        visited,
    }
}

/// Lazy iterator over entities reachable from a root.
pub struct Traversal {
    snap: Arc<Snapshot>,
    strategy: Strategy,
    direction: Direction,
    pending: VecDeque<EntityId>,
    visited: HashSet<EntityId>,
}

impl Traversal {
    fn neighbors(&self, entity: &Entity) -> Vec<EntityId> {
        match self.direction {
            Direction::Outgoing => entity
                .attrs()
                .filter(|a| a.is_ref())
                .flat_map(|a| a.values())
                .filter_map(|v| match v {
                    Value::Ref(id) => Some(id.clone()),
                    _ => None,
                })
                .collect(),
            Direction::Incoming => {
                let key = Item::Value(Value::Ref(entity.id().clone()));
                self.snap
                    .index(Permutation::Veat)
                    .inner(&key)
                    .map(|referrers| {
                        referrers
                            .keys()
                            .filter_map(|item| item.as_entity().cloned())
                            .collect()
                    })
                    .unwrap_or_default()
            }
        }
    }
}

impl Iterator for Traversal {
    type Item = Arc<Entity>;

    fn next(&mut self) -> Option<Arc<Entity>> {
        loop {
            let id = match self.strategy {
                Strategy::Bfs => self.pending.pop_front()?,
                Strategy::Dfs => self.pending.pop_back()?,
            };
            // Dangling reference: enqueued but absent from storage.
            let Some(entity) = self.snap.entity(&id).cloned() else {
                continue;
            };
            for neighbor in self.neighbors(&entity) {
                if self.visited.insert(neighbor.clone()) {
                    self.pending.push_back(neighbor);
                }
            }
            return Some(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Attribute, Cardinality, TypeTag};

    fn ref_attr(name: &str, target: &str) -> Attribute {
        Attribute::new(name, Value::Ref(target.into()), TypeTag::Ref).indexed(true)
    }

    /// a -> b -> c, plus a multi-ref a -> {c}.
    fn chain_snapshot() -> Arc<Snapshot> {
        let snap = Snapshot::empty()
            .with_entities([
                Entity::new("a")
                    .with_attr(ref_attr("node/next", "b"))
                    .with_attr(
                        Attribute::new("node/links", Value::set([Value::Ref("c".into())]), TypeTag::Ref)
                            .indexed(true)
                            .cardinality(Cardinality::Multiple),
                    ),
                Entity::new("b").with_attr(ref_attr("node/next", "c")),
                Entity::new("c"),
            ])
            .unwrap();
        Arc::new(snap)
    }

    fn visit_ids(t: Traversal) -> Vec<String> {
        t.map(|e| e.id().to_string()).collect()
    }

    #[test]
    fn outgoing_bfs_visits_each_once() {
        let snap = chain_snapshot();
        let ids = visit_ids(traverse_db(&"a".into(), snap, Strategy::Bfs, Direction::Outgoing));
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], "a");
        assert!(ids.contains(&"b".to_string()));
        assert!(ids.contains(&"c".to_string()));
    }

    #[test]
    fn incoming_walk_uses_the_veat_index() {
        let snap = chain_snapshot();
        let ids = visit_ids(traverse_db(&"c".into(), snap, Strategy::Bfs, Direction::Incoming));
        // c is referenced by b (next) and a (links); b is referenced by a.
        assert_eq!(ids[0], "c");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"a".to_string()));
        assert!(ids.contains(&"b".to_string()));
    }

    #[test]
    fn cycles_terminate() {
        let snap = Arc::new(
            Snapshot::empty()
                .with_entities([
                    Entity::new("x").with_attr(ref_attr("node/next", "y")),
                    Entity::new("y").with_attr(ref_attr("node/next", "x")),
                ])
                .unwrap(),
        );
        for strategy in [Strategy::Bfs, Strategy::Dfs] {
            let ids = visit_ids(traverse_db(&"x".into(), Arc::clone(&snap), strategy, Direction::Outgoing));
            assert_eq!(ids, vec!["x".to_string(), "y".to_string()]);
        }
    }

    #[test]
    fn dangling_references_are_skipped() {
        let snap = Arc::new(
            Snapshot::empty()
                .with_entity(Entity::new("x").with_attr(ref_attr("node/next", "ghost")))
                .unwrap(),
        );
        let ids = visit_ids(traverse_db(&"x".into(), snap, Strategy::Bfs, Direction::Outgoing));
        assert_eq!(ids, vec!["x".to_string()]);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let snap = Arc::new(Snapshot::empty());
        let ids = visit_ids(traverse_db(&"nowhere".into(), snap, Strategy::Bfs, Direction::Outgoing));
        assert!(ids.is_empty());
    }

    #[test]
    fn walks_are_restartable() {
        let snap = chain_snapshot();
        let first = visit_ids(traverse_db(&"a".into(), Arc::clone(&snap), Strategy::Bfs, Direction::Outgoing));
        let second = visit_ids(traverse_db(&"a".into(), snap, Strategy::Bfs, Direction::Outgoing));
        assert_eq!(first, second);
    }

    #[test]
    fn non_indexed_refs_produce_no_incoming_edges() {
        let snap = Arc::new(
            Snapshot::empty()
                .with_entities([
                    Entity::new("a").with_attr(
                        Attribute::new("node/next", Value::Ref("b".into()), TypeTag::Ref),
                    ),
                    Entity::new("b"),
                ])
                .unwrap(),
        );
        let ids = visit_ids(traverse_db(&"b".into(), snap, Strategy::Bfs, Direction::Incoming));
        assert_eq!(ids, vec!["b".to_string()]);
    }
}
