//! Serializes every submission and query behind a single exclusive lock.
//!
//! There is no reader/writer split: two queries block each other just as a
//! query blocks a submission. A query therefore always reads a combined view in
//! which each submitter's latest graph is either fully present or absent.

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    algo::{SearchStats, find_independent_set_with_stats, find_matching_with_stats},
    graph::{AdjacencyMap, CombinedGraph, SubmitterId},
    store::GraphStore,
    stream::{GraphFragment, assemble},
};

pub const MSG_SUBMITTED: &str = "Graph successfully submitted";
pub const MSG_INDEPENDENT_SET_FOUND: &str = "Found independent set of required size";
pub const MSG_INDEPENDENT_SET_MISSING: &str = "No independent set of required size exists";
pub const MSG_MATCHING_FOUND: &str = "Found matching of required size";
pub const MSG_MATCHING_MISSING: &str = "No matching of required size exists";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub result: bool,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    store: Mutex<GraphStore>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(GraphStore::new()),
        }
    }

    pub fn submit_graph(
        &self,
        submitter: SubmitterId,
        adjacency: AdjacencyMap,
    ) -> SubmissionResponse {
        let outcome = self.store.lock().upsert(submitter, adjacency);
        info!(
            "graph from submitter {} stored: vertices={} replaced={}",
            outcome.submitter, outcome.vertices, outcome.replaced
        );
        SubmissionResponse {
            success: true,
            message: MSG_SUBMITTED.to_string(),
        }
    }

    /// Reassembles `fragments` without holding the lock, then commits the result
    /// with a single upsert. A stream that fails to assemble leaves the store
    /// untouched.
    pub fn submit_stream<I>(&self, fragments: I) -> SubmissionResponse
    where
        I: IntoIterator<Item = GraphFragment>,
    {
        match assemble(fragments) {
            Ok((submitter, adjacency)) => self.submit_graph(submitter, adjacency),
            Err(err) => {
                warn!("stream submission rejected: {err}");
                SubmissionResponse {
                    success: false,
                    message: err.to_string(),
                }
            }
        }
    }

    pub fn has_independent_set(&self, k: i64) -> QueryResponse {
        self.run_query(
            "independent set",
            k,
            find_independent_set_with_stats,
            MSG_INDEPENDENT_SET_FOUND,
            MSG_INDEPENDENT_SET_MISSING,
        )
    }

    pub fn has_matching(&self, k: i64) -> QueryResponse {
        self.run_query(
            "matching",
            k,
            find_matching_with_stats,
            MSG_MATCHING_FOUND,
            MSG_MATCHING_MISSING,
        )
    }

    /// Runs `search` over the combined view while the lock is held.
    fn run_query<W>(
        &self,
        label: &str,
        k: i64,
        search: impl FnOnce(&CombinedGraph, i64) -> (Option<W>, SearchStats),
        found: &str,
        missing: &str,
    ) -> QueryResponse {
        let store = self.store.lock();
        let combined = store.combined_view();
        let (witness, stats) = search(&combined, k);
        drop(store);
        let result = witness.is_some();
        debug!(
            "{label} search k={k} vertices={} nodes_visited={}",
            combined.vertex_count(),
            stats.nodes_visited
        );
        info!("{label} query k={k} result={result}");
        QueryResponse {
            result,
            message: if result { found } else { missing }.to_string(),
        }
    }

    /// Combined view as of the moment the lock is acquired.
    pub fn snapshot(&self) -> CombinedGraph {
        self.store.lock().combined_view()
    }

    pub fn submitter_count(&self) -> usize {
        self.store.lock().submitter_count()
    }
}
