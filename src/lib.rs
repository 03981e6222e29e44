//! Aggregates partial graphs from independent submitters and answers
//! independent set and matching existence queries over their union.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod algo;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod generators;
pub mod graph;
pub mod protocol;
pub mod store;
pub mod stream;
pub mod transport;

pub use crate::algo::{independent_set_exists, matching_exists};
pub use crate::coordinator::{Coordinator, QueryResponse, SubmissionResponse};
pub use crate::errors::GraphAggError;
pub use crate::graph::{AdjacencyMap, CombinedGraph, SubmitterId, VertexId};
pub use crate::store::GraphStore;
pub use crate::stream::{GraphFragment, StreamAssembler};
