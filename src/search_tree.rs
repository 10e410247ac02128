//! Append-only store of visited search states, grouped into BFS levels.
//!
//! Every record gets a stable index when it is appended. Records keep a
//! back-link to their parent record forever, so any of them can be traced back
//! to the root. The states themselves are only kept for the level currently
//! being expanded (and whatever is appended while expanding it); older states
//! are dropped when the next level opens.
//!
//! Keys of every admitted state are kept in a single set for the lifetime of
//! the tree. A key is admitted at most once, so the first (shallowest)
//! discovery of a state wins.

use std::hash::Hash;
use std::ops::Range;

use rustc_hash::FxHashSet;

use crate::grid::Move;

/// How a record was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// The starting state; path reconstruction stops here.
    Root,
    /// Reached by applying `mv` to the state of record `parent`.
    Step { parent: usize, mv: Move },
}

/// Search states of type `N`, deduplicated by keys of type `K`.
pub struct SearchTree<N, K> {
    /// Resident states; `nodes[i]` belongs to record `node_offset + i`.
    nodes: Vec<N>,
    node_offset: usize,
    edges: Vec<Edge>,
    levels: Vec<Range<usize>>,
    keys: FxHashSet<K>,
}

impl<N, K: Hash + Eq> Default for SearchTree<N, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, K: Hash + Eq> SearchTree<N, K> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_offset: 0,
            edges: Vec::new(),
            levels: Vec::new(),
            keys: FxHashSet::default(),
        }
    }

    /// Records a state unless its key was admitted before.
    ///
    /// Returns whether the state was admitted.
    pub fn append(&mut self, node: N, edge: Edge, key: K) -> bool {
        if !self.keys.insert(key) {
            return false;
        }
        self.nodes.push(node);
        self.edges.push(edge);
        true
    }

    /// Closes the current level and opens the next one.
    ///
    /// The new level holds every record appended since the previous call.
    /// States of earlier levels stop being resident.
    pub fn begin_level(&mut self) {
        let start = self.levels.last().map_or(0, |level| level.end);
        let end = self.edges.len();

        self.nodes.drain(..start - self.node_offset);
        self.node_offset = start;
        self.levels.push(start..end);
    }

    /// Index range of the most recently opened level.
    ///
    /// An empty range means no new state was found and the search space is
    /// exhausted.
    pub fn current_level(&self) -> Range<usize> {
        self.levels.last().cloned().unwrap_or(0..0)
    }

    /// Number of levels opened so far.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total number of records ever admitted.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of states currently held in memory.
    pub fn resident_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the most recently appended record.
    pub fn last_index(&self) -> Option<usize> {
        self.edges.len().checked_sub(1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns the state of a record, if it is still resident.
    pub fn node_at(&self, index: usize) -> Option<&N> {
        index
            .checked_sub(self.node_offset)
            .and_then(|offset| self.nodes.get(offset))
    }

    pub fn edge_at(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Moves leading from the root to the given record, in forward order.
    ///
    /// # Panics
    ///
    /// Panics if `index` or any parent link on the way is out of range.
    pub fn path_to(&self, index: usize) -> Vec<Move> {
        let mut path = Vec::new();
        let mut current = index;
        while let Edge::Step { parent, mv } = self.edges[current] {
            path.push(mv);
            current = parent;
        }
        path.reverse();
        path
    }
}
