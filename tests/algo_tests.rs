use graphagg::{
    CombinedGraph, VertexId,
    algo::{find_independent_set, find_matching, independent_set_exists, matching_exists},
    generators::{GraphShape, generate_graph},
    graph::AdjacencyMap,
};

fn combined(map: &AdjacencyMap) -> CombinedGraph {
    map.iter()
        .map(|(vertex, neighbors)| (*vertex, neighbors.iter().copied()))
        .collect()
}

fn undirected(edges: &[(VertexId, VertexId)], isolated: &[VertexId]) -> CombinedGraph {
    let mut graph = CombinedGraph::new();
    for &vertex in isolated {
        graph.extend_vertex(vertex, &[]);
    }
    for &(a, b) in edges {
        graph.extend_vertex(a, &[b]);
        graph.extend_vertex(b, &[a]);
    }
    graph
}

#[test]
fn test_non_positive_threshold_is_trivially_true() {
    let empty = CombinedGraph::new();
    let k4 = combined(&generate_graph(GraphShape::Complete, 4, 0));
    for k in [0, -1, -50, i64::MIN] {
        assert!(independent_set_exists(&empty, k));
        assert!(matching_exists(&empty, k));
        assert!(independent_set_exists(&k4, k));
        assert!(matching_exists(&k4, k));
    }
}

#[test]
fn test_empty_graph_is_false_for_positive_threshold() {
    let empty = CombinedGraph::new();
    for k in [1, 2, 10] {
        assert!(!independent_set_exists(&empty, k));
        assert!(!matching_exists(&empty, k));
    }
}

#[test]
fn test_path_graph() {
    let path = combined(&generate_graph(GraphShape::Path, 4, 0));
    assert!(independent_set_exists(&path, 2));
    assert!(!independent_set_exists(&path, 3));
    assert!(matching_exists(&path, 2));
    assert!(!matching_exists(&path, 3));
}

#[test]
fn test_star_graph() {
    let star = combined(&generate_graph(GraphShape::Star, 5, 0));
    assert!(independent_set_exists(&star, 4));
    assert!(!independent_set_exists(&star, 5));
    assert!(matching_exists(&star, 1));
    assert!(!matching_exists(&star, 2));
}

#[test]
fn test_complete_graph_on_four_vertices() {
    let k4 = combined(&generate_graph(GraphShape::Complete, 4, 0));
    assert!(independent_set_exists(&k4, 1));
    assert!(!independent_set_exists(&k4, 2));
    assert!(matching_exists(&k4, 2));
    assert!(!matching_exists(&k4, 3));
}

#[test]
fn test_isolated_vertices_count_toward_independent_set() {
    let graph = undirected(&[(0, 1)], &[5, 6, 7]);
    assert!(independent_set_exists(&graph, 4));
    assert!(!independent_set_exists(&graph, 5));
    assert!(!matching_exists(&graph, 2));
}

#[test]
fn test_self_loop_is_ignored_by_both_searches() {
    let graph: CombinedGraph = [(0, vec![0]), (1, vec![1])].into_iter().collect();
    assert!(independent_set_exists(&graph, 2));
    assert!(!matching_exists(&graph, 1));
}

#[test]
fn test_duplicate_edges_do_not_inflate_matching() {
    // Two submitters both recorded 0-1.
    let graph: CombinedGraph = [(0, vec![1, 1]), (1, vec![0, 0])].into_iter().collect();
    assert_eq!(graph.candidate_edges(), vec![(0, 1), (0, 1)]);
    assert!(matching_exists(&graph, 1));
    assert!(!matching_exists(&graph, 2));
    assert!(!independent_set_exists(&graph, 2));
}

#[test]
fn test_edge_recorded_only_from_higher_vertex_is_not_a_matching_candidate() {
    // Only 1 -> 0 is recorded, and 1 < 0 is false.
    let graph: CombinedGraph = [(0, vec![]), (1, vec![0])].into_iter().collect();
    assert!(!matching_exists(&graph, 1));
    assert!(independent_set_exists(&graph, 2));
}

#[test]
fn test_neighbor_without_own_entry_is_not_a_vertex() {
    let graph: CombinedGraph = [(0, vec![9])].into_iter().collect();
    assert_eq!(graph.vertex_count(), 1);
    assert!(!independent_set_exists(&graph, 2));
    assert!(matching_exists(&graph, 1));
}

#[test]
fn test_monotonic_in_threshold() {
    for seed in 0..6 {
        let graph = combined(&generate_graph(GraphShape::Random { edges: 14 }, 9, seed));
        let best_set = (0..=10)
            .rev()
            .find(|&k| independent_set_exists(&graph, k))
            .expect("k = 0 always holds");
        let best_matching = (0..=10)
            .rev()
            .find(|&k| matching_exists(&graph, k))
            .expect("k = 0 always holds");
        for k in 0..=best_set {
            assert!(independent_set_exists(&graph, k), "seed {seed} k {k}");
        }
        for k in 0..=best_matching {
            assert!(matching_exists(&graph, k), "seed {seed} k {k}");
        }
        assert!(best_matching <= 4);
    }
}

#[test]
fn test_witnesses_are_valid_and_deterministic() {
    let graph = combined(&generate_graph(GraphShape::Random { edges: 12 }, 8, 7));
    if let Some(set) = find_independent_set(&graph, 3) {
        assert_eq!(set.len(), 3);
        for &a in &set {
            for &b in &set {
                if a != b {
                    assert!(!graph.lists_neighbor(a, b));
                }
            }
        }
        assert_eq!(find_independent_set(&graph, 3), Some(set));
    }
    if let Some(pairs) = find_matching(&graph, 2) {
        assert_eq!(pairs.len(), 2);
        let mut endpoints: Vec<_> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        endpoints.sort_unstable();
        endpoints.dedup();
        assert_eq!(endpoints.len(), 4);
        assert_eq!(find_matching(&graph, 2), Some(pairs));
    }
}

#[test]
fn test_cycle_and_bipartite_shapes() {
    let cycle = combined(&generate_graph(GraphShape::Cycle, 8, 0));
    assert!(independent_set_exists(&cycle, 4));
    assert!(!independent_set_exists(&cycle, 5));
    assert!(matching_exists(&cycle, 4));
    assert!(!matching_exists(&cycle, 5));

    let k34 = combined(&generate_graph(
        GraphShape::Bipartite {
            left: 3,
            right: 4,
            edges: 12,
        },
        0,
        1,
    ));
    assert!(independent_set_exists(&k34, 4));
    assert!(!independent_set_exists(&k34, 5));
    assert!(matching_exists(&k34, 3));
    assert!(!matching_exists(&k34, 4));
}
