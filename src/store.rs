use ahash::AHashMap;

use crate::graph::{AdjacencyMap, CombinedGraph, SubmitterId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub submitter: SubmitterId,
    pub vertices: usize,
    pub replaced: bool,
}

/// Holds the latest partial graph of every submitter.
#[derive(Debug, Default)]
pub struct GraphStore {
    graphs: AHashMap<SubmitterId, AdjacencyMap>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            graphs: AHashMap::new(),
        }
    }

    /// Replaces `submitter`'s graph wholesale. Nothing from the previous
    /// submission survives.
    pub fn upsert(&mut self, submitter: SubmitterId, adjacency: AdjacencyMap) -> UpsertOutcome {
        let vertices = adjacency.len();
        let replaced = self.graphs.insert(submitter, adjacency).is_some();
        UpsertOutcome {
            submitter,
            vertices,
            replaced,
        }
    }

    /// Unions every stored graph. Submitters are visited in ascending id order and
    /// each submitter's vertices in ascending order, so neighbor concatenation is
    /// reproducible.
    pub fn combined_view(&self) -> CombinedGraph {
        let mut combined = CombinedGraph::new();
        for submitter in self.submitters() {
            let Some(adjacency) = self.graphs.get(&submitter) else {
                continue;
            };
            let mut vertices: Vec<_> = adjacency.keys().copied().collect();
            vertices.sort_unstable();
            for vertex in vertices {
                combined.extend_vertex(vertex, &adjacency[&vertex]);
            }
        }
        combined
    }

    pub fn submitter_count(&self) -> usize {
        self.graphs.len()
    }

    pub fn submitters(&self) -> Vec<SubmitterId> {
        let mut ids: Vec<_> = self.graphs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn graph_of(&self, submitter: SubmitterId) -> Option<&AdjacencyMap> {
        self.graphs.get(&submitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::adjacency_from;

    #[test]
    fn upsert_reports_replacement() {
        let mut store = GraphStore::new();
        let first = store.upsert(1, adjacency_from([(0, vec![1]), (1, vec![0])]));
        assert!(!first.replaced);
        assert_eq!(first.vertices, 2);
        let second = store.upsert(1, adjacency_from([(5, vec![])]));
        assert!(second.replaced);
        assert_eq!(store.combined_view().vertices(), vec![5]);
    }

    #[test]
    fn combined_view_concatenates_in_submitter_order() {
        let mut store = GraphStore::new();
        store.upsert(7, adjacency_from([(0, vec![3])]));
        store.upsert(2, adjacency_from([(0, vec![1, 2])]));
        let combined = store.combined_view();
        assert_eq!(combined.neighbors(0), &[1, 2, 3]);
    }
}
