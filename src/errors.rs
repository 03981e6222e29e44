use thiserror::Error;

use crate::graph::SubmitterId;

#[derive(Debug, Error)]
pub enum GraphAggError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("stream fragment from submitter {found} does not match submitter {expected}")]
    StreamMismatch {
        expected: SubmitterId,
        found: SubmitterId,
    },
    #[error("stream error: {0}")]
    EmptyStream(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("config error: {0}")]
    Config(String),
}

impl GraphAggError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GraphAggError::InvalidInput(msg.into())
    }

    pub fn empty_stream<T: Into<String>>(msg: T) -> Self {
        GraphAggError::EmptyStream(msg.into())
    }

    pub fn protocol<T: Into<String>>(msg: T) -> Self {
        GraphAggError::Protocol(msg.into())
    }

    pub fn transport<T: Into<String>>(msg: T) -> Self {
        GraphAggError::Transport(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GraphAggError::Config(msg.into())
    }

    /// True when the failure happened below the protocol, i.e. the request or
    /// response never made it across the connection.
    pub fn is_transport(&self) -> bool {
        matches!(self, GraphAggError::Transport(_))
    }
}

impl From<std::io::Error> for GraphAggError {
    fn from(err: std::io::Error) -> Self {
        GraphAggError::transport(err.to_string())
    }
}

impl From<serde_json::Error> for GraphAggError {
    fn from(err: serde_json::Error) -> Self {
        GraphAggError::protocol(err.to_string())
    }
}
