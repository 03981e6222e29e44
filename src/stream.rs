use serde::{Deserialize, Serialize};

use crate::{
    errors::GraphAggError,
    graph::{AdjacencyMap, SubmitterId},
};

/// One part of a multi-part submission. Only the first fragment has to name
/// the submitter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<SubmitterId>,
    #[serde(default)]
    pub adjacency: AdjacencyMap,
}

impl GraphFragment {
    pub fn first(client_id: SubmitterId, adjacency: AdjacencyMap) -> Self {
        Self {
            client_id: Some(client_id),
            adjacency,
        }
    }

    pub fn continuation(adjacency: AdjacencyMap) -> Self {
        Self {
            client_id: None,
            adjacency,
        }
    }
}

/// Reassembles a streamed submission privately, so nothing reaches the shared
/// store until [`StreamAssembler::finish`] hands back the complete map.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    submitter: Option<SubmitterId>,
    adjacency: AdjacencyMap,
    fragments: usize,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment. A vertex seen in an earlier fragment takes this
    /// fragment's neighbor list.
    pub fn push(&mut self, fragment: GraphFragment) -> Result<(), GraphAggError> {
        match (self.submitter, fragment.client_id) {
            (None, Some(id)) => self.submitter = Some(id),
            (None, None) => {
                return Err(GraphAggError::invalid_input(
                    "first stream fragment must carry a client id",
                ));
            }
            (Some(expected), Some(found)) if expected != found => {
                return Err(GraphAggError::StreamMismatch { expected, found });
            }
            (Some(_), _) => {}
        }
        self.adjacency.extend(fragment.adjacency);
        self.fragments += 1;
        Ok(())
    }

    pub fn submitter(&self) -> Option<SubmitterId> {
        self.submitter
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn finish(self) -> Result<(SubmitterId, AdjacencyMap), GraphAggError> {
        let submitter = self
            .submitter
            .ok_or_else(|| GraphAggError::empty_stream("stream carried no fragments"))?;
        Ok((submitter, self.adjacency))
    }
}

/// Assembles a complete fragment sequence in one call.
pub fn assemble<I>(fragments: I) -> Result<(SubmitterId, AdjacencyMap), GraphAggError>
where
    I: IntoIterator<Item = GraphFragment>,
{
    let mut assembler = StreamAssembler::new();
    for fragment in fragments {
        assembler.push(fragment)?;
    }
    assembler.finish()
}
