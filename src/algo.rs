//! Exhaustive backtracking searches over a [`CombinedGraph`].
//!
//! Both searches walk their candidate list in a fixed order (ascending vertex id,
//! then neighbor-list order for edges) and always try skipping a candidate before
//! taking it. Given the same graph and threshold they return the same witness.

use ahash::AHashSet;

use crate::graph::{CombinedGraph, VertexId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates tried, plus one for the root.
    pub nodes_visited: u64,
}

/// True iff some set of at least `k` vertices has no member listed as a
/// neighbor by another member.
pub fn independent_set_exists(graph: &CombinedGraph, k: i64) -> bool {
    find_independent_set(graph, k).is_some()
}

/// True iff `k` pairwise vertex-disjoint edges exist among the `v < w` entries
/// of `graph`.
pub fn matching_exists(graph: &CombinedGraph, k: i64) -> bool {
    find_matching(graph, k).is_some()
}

pub fn find_independent_set(graph: &CombinedGraph, k: i64) -> Option<Vec<VertexId>> {
    find_independent_set_with_stats(graph, k).0
}

pub fn find_matching(graph: &CombinedGraph, k: i64) -> Option<Vec<(VertexId, VertexId)>> {
    find_matching_with_stats(graph, k).0
}

pub fn find_independent_set_with_stats(
    graph: &CombinedGraph,
    k: i64,
) -> (Option<Vec<VertexId>>, SearchStats) {
    let mut stats = SearchStats::default();
    let Some(target) = positive_target(k) else {
        return (Some(Vec::new()), stats);
    };
    let vertices = graph.vertices();
    let mut search = IndependentSetSearch {
        graph,
        vertices: &vertices,
        current: Vec::new(),
    };
    let witness = backtrack(&mut search, target, &mut stats).then_some(search.current);
    (witness, stats)
}

pub fn find_matching_with_stats(
    graph: &CombinedGraph,
    k: i64,
) -> (Option<Vec<(VertexId, VertexId)>>, SearchStats) {
    let mut stats = SearchStats::default();
    let Some(target) = positive_target(k) else {
        return (Some(Vec::new()), stats);
    };
    let edges = graph.candidate_edges();
    let mut search = MatchingSearch {
        edges: &edges,
        matched: AHashSet::new(),
        pairs: Vec::new(),
    };
    let witness = backtrack(&mut search, target, &mut stats).then_some(search.pairs);
    (witness, stats)
}

// k <= 0 is satisfied by the empty set.
fn positive_target(k: i64) -> Option<usize> {
    if k <= 0 {
        return None;
    }
    Some(usize::try_from(k).unwrap_or(usize::MAX))
}

/// A candidate list walked by [`backtrack`]. `take` adds candidate `index` to
/// the partial solution if it fits; `release` undoes the latest successful take.
trait Candidates {
    fn count(&self) -> usize;
    fn take(&mut self, index: usize) -> bool;
    fn release(&mut self);
}

/// Include/exclude search over `candidates` with an explicit stack, so depth is
/// bounded by heap memory rather than the thread stack.
///
/// Each level tries its remaining candidates from the highest index down. That
/// is the order a recursive search visits them when it tries excluding a
/// candidate before including it.
fn backtrack<C: Candidates>(candidates: &mut C, target: usize, stats: &mut SearchStats) -> bool {
    let total = candidates.count();
    stats.nodes_visited += 1;
    let mut taken: Vec<usize> = Vec::new();
    let mut cursors = vec![level_cursor(total, target)];
    while let Some(cursor) = cursors.last_mut() {
        let floor = taken.last().map_or(0, |&index| index + 1);
        if *cursor <= floor {
            cursors.pop();
            if taken.pop().is_some() {
                candidates.release();
            }
            continue;
        }
        *cursor -= 1;
        let index = *cursor;
        stats.nodes_visited += 1;
        if candidates.take(index) {
            taken.push(index);
            if taken.len() >= target {
                return true;
            }
            cursors.push(level_cursor(total, target - taken.len()));
        }
    }
    false
}

// Exclusive upper bound for a level that still needs `needed` candidates: a
// candidate past it leaves too few behind to reach the target.
fn level_cursor(total: usize, needed: usize) -> usize {
    (total + 1).saturating_sub(needed)
}

struct IndependentSetSearch<'a> {
    graph: &'a CombinedGraph,
    vertices: &'a [VertexId],
    current: Vec<VertexId>,
}

impl IndependentSetSearch<'_> {
    /// Only members' adjacency lists are consulted: a candidate that lists a
    /// member, without the member listing it back, is still compatible.
    fn compatible(&self, candidate: VertexId) -> bool {
        !self
            .current
            .iter()
            .any(|&member| self.graph.lists_neighbor(member, candidate))
    }
}

impl Candidates for IndependentSetSearch<'_> {
    fn count(&self) -> usize {
        self.vertices.len()
    }

    fn take(&mut self, index: usize) -> bool {
        let candidate = self.vertices[index];
        if !self.compatible(candidate) {
            return false;
        }
        self.current.push(candidate);
        true
    }

    fn release(&mut self) {
        self.current.pop();
    }
}

struct MatchingSearch<'a> {
    edges: &'a [(VertexId, VertexId)],
    matched: AHashSet<VertexId>,
    pairs: Vec<(VertexId, VertexId)>,
}

impl Candidates for MatchingSearch<'_> {
    fn count(&self) -> usize {
        self.edges.len()
    }

    fn take(&mut self, index: usize) -> bool {
        let (v1, v2) = self.edges[index];
        if self.matched.contains(&v1) || self.matched.contains(&v2) {
            return false;
        }
        self.matched.insert(v1);
        self.matched.insert(v2);
        self.pairs.push((v1, v2));
        true
    }

    fn release(&mut self) {
        if let Some((v1, v2)) = self.pairs.pop() {
            self.matched.remove(&v1);
            self.matched.remove(&v2);
        }
    }
}
