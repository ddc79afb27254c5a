//! The three EAV permutation indices.
//!
//! An [`Index`] is a three-level nested mapping over datom components,
//! carrying a [`Permutation`] descriptor that says which of (entity,
//! attribute-name, value) occupies each level:
//!
//! - `EAVT`: entity → attribute-name → {value}
//! - `AVET`: attribute-name → value → {entity}
//! - `VEAT`: value → entity → {attribute-name}
//!
//! Only attributes whose `indexed` flag is set appear here. Inner levels are
//! `Arc`-shared so a cloned index reuses every subtree the next snapshot
//! leaves untouched; mutation goes through `Arc::make_mut`, which copies a
//! subtree only when it is still shared.

use crate::datom::{Datom, Item};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// The second level of an index: level-2 key to leaf set.
pub type InnerLevel = BTreeMap<Item, Arc<BTreeSet<Item>>>;

/// Which datom component occupies which index level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permutation {
    /// entity → attribute-name → {value}
    Eavt,
    /// attribute-name → value → {entity}
    Avet,
    /// value → entity → {attribute-name}
    Veat,
}

impl Permutation {
    /// Reorders an `(e, a, v)` triple into this permutation's level order.
    pub fn apply<T>(self, e: T, a: T, v: T) -> (T, T, T) {
        match self {
            Permutation::Eavt => (e, a, v),
            Permutation::Avet => (a, v, e),
            Permutation::Veat => (v, e, a),
        }
    }

    /// Reorders a level triple back into `(e, a, v)` order.
    pub fn invert<T>(self, l1: T, l2: T, l3: T) -> (T, T, T) {
        match self {
            Permutation::Eavt => (l1, l2, l3),
            Permutation::Avet => (l3, l1, l2),
            Permutation::Veat => (l2, l3, l1),
        }
    }

    /// Splits a datom into this permutation's level order.
    #[must_use]
    pub fn apply_datom(self, datom: Datom) -> (Item, Item, Item) {
        self.apply(
            Item::Entity(datom.entity),
            Item::Attr(datom.attr),
            Item::Value(datom.value),
        )
    }

    /// Reassembles a datom from a level triple.
    ///
    /// Returns `None` if the components do not have the shapes this
    /// permutation stores at those levels.
    #[must_use]
    pub fn datom(self, l1: Item, l2: Item, l3: Item) -> Option<Datom> {
        match self.invert(l1, l2, l3) {
            (Item::Entity(entity), Item::Attr(attr), Item::Value(value)) => Some(Datom {
                entity,
                attr,
                value,
            }),
            _ => None,
        }
    }
}

/// A three-level nested mapping in one EAV permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    perm: Permutation,
    root: BTreeMap<Item, Arc<InnerLevel>>,
    /// Number of distinct paths.
    count: usize,
}

impl Index {
    /// Creates an empty index for the given permutation.
    #[must_use]
    pub fn new(perm: Permutation) -> Self {
        Self {
            perm,
            root: BTreeMap::new(),
            count: 0,
        }
    }

    /// The index's permutation descriptor.
    #[must_use]
    pub fn permutation(&self) -> Permutation {
        self.perm
    }

    /// Number of distinct paths in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the index holds no paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Inserts the path for a datom. Returns false if it was already
    /// present.
    pub fn insert(&mut self, datom: Datom) -> bool {
        let (l1, l2, l3) = self.perm.apply_datom(datom);
        let inner = self.root.entry(l1).or_insert_with(Default::default);
        let leaf = Arc::make_mut(inner)
            .entry(l2)
            .or_insert_with(Default::default);
        let added = Arc::make_mut(leaf).insert(l3);
        if added {
            self.count += 1;
        }
        added
    }

    /// Removes the path for a datom, pruning emptied inner maps. Returns
    /// false if the path was not present.
    pub fn remove(&mut self, datom: Datom) -> bool {
        let (l1, l2, l3) = self.perm.apply_datom(datom);
        let Some(inner) = self.root.get_mut(&l1) else {
            return false;
        };
        let inner_map = Arc::make_mut(inner);
        let Some(leaf) = inner_map.get_mut(&l2) else {
            return false;
        };
        let removed = Arc::make_mut(leaf).remove(&l3);
        if !removed {
            return false;
        }
        if leaf.is_empty() {
            inner_map.remove(&l2);
        }
        if inner_map.is_empty() {
            self.root.remove(&l1);
        }
        self.count -= 1;
        true
    }

    /// Returns true if the datom's path is present.
    #[must_use]
    pub fn contains(&self, datom: &Datom) -> bool {
        let (l1, l2, l3) = self.perm.apply_datom(datom.clone());
        self.root
            .get(&l1)
            .and_then(|inner| inner.get(&l2))
            .is_some_and(|leaf| leaf.contains(&l3))
    }

    /// Iterates the level-1 entries in key order.
    pub fn levels(&self) -> impl Iterator<Item = (&Item, &InnerLevel)> {
        self.root.iter().map(|(k, inner)| (k, inner.as_ref()))
    }

    /// Looks up the inner level under a level-1 key.
    #[must_use]
    pub fn inner(&self, l1: &Item) -> Option<&InnerLevel> {
        self.root.get(l1).map(Arc::as_ref)
    }

    /// Looks up a leaf set under a level-1 and level-2 key.
    #[must_use]
    pub fn leaf(&self, l1: &Item, l2: &Item) -> Option<&BTreeSet<Item>> {
        self.root
            .get(l1)
            .and_then(|inner| inner.get(l2))
            .map(Arc::as_ref)
    }

    /// Iterates every path as a reassembled datom, in level order.
    pub fn datoms(&self) -> impl Iterator<Item = Datom> + '_ {
        self.root.iter().flat_map(move |(l1, inner)| {
            inner.iter().flat_map(move |(l2, leaf)| {
                leaf.iter().filter_map(move |l3| {
                    self.perm.datom(l1.clone(), l2.clone(), l3.clone())
                })
            })
        })
    }
}
