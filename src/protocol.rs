//! Request and response messages for the four service operations, plus a
//! one-JSON-document-per-line codec.

use serde::{Deserialize, Serialize};

use crate::{
    coordinator::{Coordinator, QueryResponse, SubmissionResponse},
    errors::GraphAggError,
    graph::{AdjacencyMap, SubmitterId},
    stream::{GraphFragment, StreamAssembler},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    SubmitGraph {
        client_id: SubmitterId,
        adjacency: AdjacencyMap,
    },
    SubmitGraphStream {
        fragments: Vec<GraphFragment>,
    },
    HasIndependentSet {
        size_threshold: i64,
    },
    HasMatching {
        size_threshold: i64,
    },
    /// One part of a multi-message upload; buffered per connection.
    StreamFragment(GraphFragment),
    /// Commits the buffered upload with a single store update.
    StreamCommit,
    Status,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Submission(SubmissionResponse),
    Query(QueryResponse),
    FragmentAccepted { fragments: usize },
    Status { submitters: usize, vertices: usize },
    Error { message: String },
}

/// Runs one request against the coordinator. Every outcome, including a
/// negative answer or a rejected stream, comes back as a response.
///
/// Multi-message uploads need per-connection state; without a [`Session`]
/// their requests are answered with an error.
pub fn dispatch(coordinator: &Coordinator, request: Request) -> Response {
    match request {
        Request::SubmitGraph {
            client_id,
            adjacency,
        } => Response::Submission(coordinator.submit_graph(client_id, adjacency)),
        Request::SubmitGraphStream { fragments } => {
            Response::Submission(coordinator.submit_stream(fragments))
        }
        Request::HasIndependentSet { size_threshold } => {
            Response::Query(coordinator.has_independent_set(size_threshold))
        }
        Request::HasMatching { size_threshold } => {
            Response::Query(coordinator.has_matching(size_threshold))
        }
        Request::StreamFragment(_) | Request::StreamCommit => Response::Error {
            message: "stream requests need a session".to_string(),
        },
        Request::Status => Response::Status {
            submitters: coordinator.submitter_count(),
            vertices: coordinator.snapshot().vertex_count(),
        },
    }
}

/// Per-connection request handler. Stream fragments are buffered here, outside
/// the coordinator lock, until [`Request::StreamCommit`] arrives.
pub struct Session<'a> {
    coordinator: &'a Coordinator,
    pending: Option<StreamAssembler>,
}

impl<'a> Session<'a> {
    pub fn new(coordinator: &'a Coordinator) -> Self {
        Self {
            coordinator,
            pending: None,
        }
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::StreamFragment(fragment) => {
                let assembler = self.pending.get_or_insert_with(StreamAssembler::new);
                match assembler.push(fragment) {
                    Ok(()) => Response::FragmentAccepted {
                        fragments: assembler.fragment_count(),
                    },
                    Err(err) => {
                        self.pending = None;
                        Response::Submission(SubmissionResponse {
                            success: false,
                            message: err.to_string(),
                        })
                    }
                }
            }
            Request::StreamCommit => {
                let assembler = self.pending.take().unwrap_or_default();
                let response = match assembler.finish() {
                    Ok((submitter, adjacency)) => {
                        self.coordinator.submit_graph(submitter, adjacency)
                    }
                    Err(err) => SubmissionResponse {
                        success: false,
                        message: err.to_string(),
                    },
                };
                Response::Submission(response)
            }
            other => dispatch(self.coordinator, other),
        }
    }

    /// True while an upload has fragments that were not yet committed.
    pub fn has_pending_stream(&self) -> bool {
        self.pending.is_some()
    }
}

pub fn encode_line<T: Serialize>(message: &T) -> Result<String, GraphAggError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

pub fn decode_line<T>(line: &str) -> Result<T, GraphAggError>
where
    T: for<'de> Deserialize<'de>,
{
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(GraphAggError::protocol("empty message"));
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let request: Request =
            decode_line(r#"{"has_matching":{"size_threshold":-2}}"#).expect("decode");
        assert_eq!(request, Request::HasMatching { size_threshold: -2 });
        let line = encode_line(&Request::Status).expect("encode");
        assert_eq!(line, "\"status\"\n");
    }

    #[test]
    fn session_commits_fragments_once() {
        let coordinator = Coordinator::new();
        let mut session = Session::new(&coordinator);
        let first = GraphFragment::first(4, [(0, vec![1])].into_iter().collect());
        let second = GraphFragment::continuation([(1, vec![0])].into_iter().collect());
        assert_eq!(
            session.handle(Request::StreamFragment(first)),
            Response::FragmentAccepted { fragments: 1 }
        );
        session.handle(Request::StreamFragment(second));
        assert_eq!(coordinator.submitter_count(), 0);
        let committed = session.handle(Request::StreamCommit);
        assert!(matches!(
            committed,
            Response::Submission(SubmissionResponse { success: true, .. })
        ));
        assert!(!session.has_pending_stream());
        assert_eq!(coordinator.snapshot().vertices(), vec![0, 1]);
    }

    #[test]
    fn commit_without_fragments_is_rejected() {
        let coordinator = Coordinator::new();
        let mut session = Session::new(&coordinator);
        let response = session.handle(Request::StreamCommit);
        assert!(matches!(
            response,
            Response::Submission(SubmissionResponse { success: false, .. })
        ));
        assert_eq!(coordinator.submitter_count(), 0);
    }

    #[test]
    fn blank_line_is_a_protocol_error() {
        let err = decode_line::<Request>("  \n").unwrap_err();
        assert!(matches!(err, GraphAggError::Protocol(_)));
    }
}
