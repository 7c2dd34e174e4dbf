//! Parent pointers recorded by a search.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tilenav_core::Coord;

/// Coordinate → parent, with `None` marking a root. Every coordinate is
/// written at most once; later writes are ignored.
#[derive(Clone, Debug, Default)]
pub struct ParentMap {
    parents: FxHashMap<Coord, Option<Coord>>,
}

impl ParentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parents: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Record `c` as a search root. Returns `false` if `c` was already known.
    #[inline]
    pub fn insert_root(&mut self, c: Coord) -> bool {
        self.put(c, None)
    }

    /// Record `parent` as the parent of `child`. Returns `false` if `child`
    /// was already known.
    #[inline]
    pub fn insert(&mut self, child: Coord, parent: Coord) -> bool {
        self.put(child, Some(parent))
    }

    #[inline]
    fn put(&mut self, c: Coord, parent: Option<Coord>) -> bool {
        match self.parents.entry(c) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                v.insert(parent);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.parents.contains_key(&c)
    }

    /// `None` if `c` was never reached, `Some(None)` for a root.
    #[inline]
    pub fn parent(&self, c: Coord) -> Option<Option<Coord>> {
        self.parents.get(&c).copied()
    }

    /// Number of reached coordinates.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Coordinates from a root to `goal`, inclusive. Empty if `goal` was
    /// never reached.
    pub fn path_to(&self, goal: Coord) -> Vec<Coord> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(c) = current {
            let Some(parent) = self.parent(c) else {
                return Vec::new();
            };
            path.push(c);
            // A walk longer than the map means a cycle.
            if path.len() > self.parents.len() {
                return Vec::new();
            }
            current = parent;
        }
        path.reverse();
        path
    }
}
