use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

pub type SubmitterId = i64;
pub type VertexId = i64;

/// One submitter's partial graph. Neighbor order is preserved as submitted;
/// symmetry, self-loops and duplicates are not checked.
pub type AdjacencyMap = AHashMap<VertexId, Vec<VertexId>>;

/// Builds an [`AdjacencyMap`] from `(vertex, neighbors)` pairs. A vertex listed
/// twice keeps the later neighbor list.
pub fn adjacency_from<I, N>(entries: I) -> AdjacencyMap
where
    I: IntoIterator<Item = (VertexId, N)>,
    N: IntoIterator<Item = VertexId>,
{
    entries
        .into_iter()
        .map(|(vertex, neighbors)| (vertex, neighbors.into_iter().collect()))
        .collect()
}

/// Union of every submitter's adjacency, keyed by vertex in ascending order.
///
/// Neighbor lists are concatenated, never deduplicated, so an entry may hold the
/// same neighbor more than once and may list `v -> w` without `w -> v`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedGraph {
    adjacency: BTreeMap<VertexId, Vec<VertexId>>,
}

impl CombinedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `neighbors` to the entry for `vertex`, creating it if needed.
    /// An empty slice still registers the vertex.
    pub fn extend_vertex(&mut self, vertex: VertexId, neighbors: &[VertexId]) {
        self.adjacency
            .entry(vertex)
            .or_default()
            .extend_from_slice(neighbors);
    }

    pub fn vertices(&self) -> Vec<VertexId> {
        self.adjacency.keys().copied().collect()
    }

    pub fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        self.adjacency
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Total length of all neighbor lists, duplicates included.
    pub fn adjacency_entries(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// True when `from`'s recorded neighbors include `to`. Direction matters.
    pub fn lists_neighbor(&self, from: VertexId, to: VertexId) -> bool {
        self.neighbors(from).contains(&to)
    }

    /// Edge candidates for matching: every recorded `(v, w)` with `v < w`, in
    /// ascending `v` and then neighbor-list order.
    ///
    /// Only the mirrored direction of an edge is dropped. The same `(v, w)`
    /// recorded twice appears twice, and self-loops never appear.
    pub fn candidate_edges(&self) -> Vec<(VertexId, VertexId)> {
        let mut edges = Vec::new();
        for (&vertex, neighbors) in &self.adjacency {
            for &neighbor in neighbors {
                if vertex < neighbor {
                    edges.push((vertex, neighbor));
                }
            }
        }
        edges
    }
}

impl<N> FromIterator<(VertexId, N)> for CombinedGraph
where
    N: IntoIterator<Item = VertexId>,
{
    fn from_iter<I: IntoIterator<Item = (VertexId, N)>>(iter: I) -> Self {
        let mut graph = CombinedGraph::new();
        for (vertex, neighbors) in iter {
            let neighbors: Vec<VertexId> = neighbors.into_iter().collect();
            graph.extend_vertex(vertex, &neighbors);
        }
        graph
    }
}
