use ahash::AHashSet;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::graph::{AdjacencyMap, VertexId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphShape {
    Random { edges: usize },
    Complete,
    Star,
    Cycle,
    Path,
    /// `left + right` vertices; `vertices` is ignored.
    Bipartite {
        left: usize,
        right: usize,
        edges: usize,
    },
}

impl GraphShape {
    pub fn parse(name: &str, edges: usize, left: usize, right: usize) -> Option<Self> {
        match name {
            "random" => Some(GraphShape::Random { edges }),
            "complete" => Some(GraphShape::Complete),
            "star" => Some(GraphShape::Star),
            "cycle" => Some(GraphShape::Cycle),
            "path" => Some(GraphShape::Path),
            "bipartite" => Some(GraphShape::Bipartite { left, right, edges }),
            _ => None,
        }
    }
}

/// Builds an undirected graph on vertices `0..vertices` with every edge recorded
/// in both directions. Random shapes are reproducible for a given `seed`; the
/// edge count is capped at what the shape can hold.
pub fn generate_graph(shape: GraphShape, vertices: usize, seed: u64) -> AdjacencyMap {
    let total = match shape {
        GraphShape::Bipartite { left, right, .. } => left + right,
        _ => vertices,
    };
    let mut builder = Builder::new(total);
    match shape {
        GraphShape::Random { edges } => {
            let max = total * total.saturating_sub(1) / 2;
            let mut rng = StdRng::seed_from_u64(seed);
            while builder.edge_count() < edges.min(max) {
                let a = rng.gen_range(0..total);
                let b = rng.gen_range(0..total);
                if a != b {
                    builder.connect(a, b);
                }
            }
        }
        GraphShape::Complete => {
            for a in 0..total {
                for b in a + 1..total {
                    builder.connect(a, b);
                }
            }
        }
        GraphShape::Star => {
            for leaf in 1..total {
                builder.connect(0, leaf);
            }
        }
        GraphShape::Cycle => {
            if total >= 3 {
                for a in 0..total {
                    builder.connect(a, (a + 1) % total);
                }
            } else if total == 2 {
                builder.connect(0, 1);
            }
        }
        GraphShape::Path => {
            for a in 1..total {
                builder.connect(a - 1, a);
            }
        }
        GraphShape::Bipartite { left, right, edges } => {
            let mut rng = StdRng::seed_from_u64(seed);
            while builder.edge_count() < edges.min(left * right) {
                let a = rng.gen_range(0..left);
                let b = left + rng.gen_range(0..right);
                builder.connect(a, b);
            }
        }
    }
    builder.finish()
}

/// Splits `graph` into `parts` partial graphs by assigning vertex `v` (with its
/// whole neighbor list) to part `v mod parts`. Their union is `graph` again.
pub fn split_round_robin(graph: &AdjacencyMap, parts: usize) -> Vec<AdjacencyMap> {
    let parts = parts.max(1);
    let mut split = vec![AdjacencyMap::new(); parts];
    for (&vertex, neighbors) in graph {
        let slot = vertex.rem_euclid(parts as VertexId) as usize;
        split[slot].insert(vertex, neighbors.clone());
    }
    split
}

struct Builder {
    adjacency: Vec<Vec<VertexId>>,
    seen: AHashSet<(usize, usize)>,
}

impl Builder {
    fn new(vertices: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertices],
            seen: AHashSet::new(),
        }
    }

    fn connect(&mut self, a: usize, b: usize) {
        let key = (a.min(b), a.max(b));
        if !self.seen.insert(key) {
            return;
        }
        self.adjacency[a].push(b as VertexId);
        self.adjacency[b].push(a as VertexId);
    }

    fn edge_count(&self) -> usize {
        self.seen.len()
    }

    fn finish(self) -> AdjacencyMap {
        self.adjacency
            .into_iter()
            .enumerate()
            .map(|(vertex, neighbors)| (vertex as VertexId, neighbors))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_graph_is_seeded() {
        let a = generate_graph(GraphShape::Random { edges: 12 }, 10, 42);
        let b = generate_graph(GraphShape::Random { edges: 12 }, 10, 42);
        assert_eq!(a, b);
        let degree_sum: usize = a.values().map(Vec::len).sum();
        assert_eq!(degree_sum, 24);
    }

    #[test]
    fn edge_request_is_capped() {
        let graph = generate_graph(GraphShape::Random { edges: 100 }, 4, 1);
        let degree_sum: usize = graph.values().map(Vec::len).sum();
        assert_eq!(degree_sum, 12);
    }
}
