//! Line-delimited JSON over TCP, one thread per connection.

use std::{
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
    sync::Arc,
    thread,
};

use log::{debug, info, warn};

use crate::{
    coordinator::{Coordinator, QueryResponse, SubmissionResponse},
    errors::GraphAggError,
    graph::{AdjacencyMap, SubmitterId},
    protocol::{Request, Response, Session, decode_line, encode_line},
    stream::GraphFragment,
};

pub struct Server {
    listener: TcpListener,
    coordinator: Arc<Coordinator>,
}

impl Server {
    pub fn bind(addr: SocketAddr, coordinator: Arc<Coordinator>) -> Result<Self, GraphAggError> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| GraphAggError::transport(format!("bind {addr}: {e}")))?;
        Ok(Self {
            listener,
            coordinator,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GraphAggError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the listener fails.
    pub fn serve(self) -> Result<(), GraphAggError> {
        info!("server listening on {}", self.local_addr()?);
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("accept failed: {err}");
                    continue;
                }
            };
            let coordinator = Arc::clone(&self.coordinator);
            thread::spawn(move || {
                let peer = stream
                    .peer_addr()
                    .map(|addr| addr.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("connection from {peer}");
                if let Err(err) = handle_connection(stream, &coordinator) {
                    warn!("connection {peer} closed with error: {err}");
                }
            });
        }
        Ok(())
    }

    /// Runs [`Server::serve`] on a background thread.
    pub fn spawn(self) -> Result<(SocketAddr, thread::JoinHandle<()>), GraphAggError> {
        let addr = self.local_addr()?;
        let handle = thread::spawn(move || {
            if let Err(err) = self.serve() {
                warn!("server stopped: {err}");
            }
        });
        Ok((addr, handle))
    }
}

fn handle_connection(stream: TcpStream, coordinator: &Coordinator) -> Result<(), GraphAggError> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut session = Session::new(coordinator);
    let mut buf = Vec::new();
    loop {
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let response = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => decode_line::<Request>(&line).map(|request| session.handle(request)),
            Err(err) => Err(GraphAggError::protocol(format!("request is not UTF-8: {err}"))),
        }
        .unwrap_or_else(|err| Response::Error {
            message: err.to_string(),
        });
        writer.write_all(encode_line(&response)?.as_bytes())?;
        writer.flush()?;
    }
    if session.has_pending_stream() {
        warn!("connection closed with an uncommitted stream; discarding it");
    }
    Ok(())
}

/// Blocking client. Any failure to move a request or response across the
/// connection is reported as [`GraphAggError::Transport`], never as a `false`
/// answer.
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, GraphAggError> {
        let writer = TcpStream::connect(addr)?;
        let reader = BufReader::new(writer.try_clone()?);
        Ok(Self { reader, writer })
    }

    pub fn call(&mut self, request: &Request) -> Result<Response, GraphAggError> {
        self.writer.write_all(encode_line(request)?.as_bytes())?;
        self.writer.flush()?;
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(GraphAggError::transport("connection closed by server"));
        }
        decode_line(&line)
    }

    pub fn submit_graph(
        &mut self,
        client_id: SubmitterId,
        adjacency: AdjacencyMap,
    ) -> Result<SubmissionResponse, GraphAggError> {
        let response = self.call(&Request::SubmitGraph {
            client_id,
            adjacency,
        })?;
        expect_submission(response)
    }

    /// Uploads `fragments` one message at a time and commits them. The server
    /// makes the graph visible only after the commit.
    pub fn submit_stream<I>(&mut self, fragments: I) -> Result<SubmissionResponse, GraphAggError>
    where
        I: IntoIterator<Item = GraphFragment>,
    {
        for fragment in fragments {
            match self.call(&Request::StreamFragment(fragment))? {
                Response::FragmentAccepted { .. } => {}
                other => return expect_submission(other),
            }
        }
        let response = self.call(&Request::StreamCommit)?;
        expect_submission(response)
    }

    pub fn has_independent_set(&mut self, k: i64) -> Result<QueryResponse, GraphAggError> {
        let response = self.call(&Request::HasIndependentSet { size_threshold: k })?;
        expect_query(response)
    }

    pub fn has_matching(&mut self, k: i64) -> Result<QueryResponse, GraphAggError> {
        let response = self.call(&Request::HasMatching { size_threshold: k })?;
        expect_query(response)
    }

    /// Returns `(submitters, vertices)` currently held by the server.
    pub fn status(&mut self) -> Result<(usize, usize), GraphAggError> {
        match self.call(&Request::Status)? {
            Response::Status {
                submitters,
                vertices,
            } => Ok((submitters, vertices)),
            other => Err(unexpected(other)),
        }
    }
}

fn expect_submission(response: Response) -> Result<SubmissionResponse, GraphAggError> {
    match response {
        Response::Submission(submission) => Ok(submission),
        other => Err(unexpected(other)),
    }
}

fn expect_query(response: Response) -> Result<QueryResponse, GraphAggError> {
    match response {
        Response::Query(query) => Ok(query),
        other => Err(unexpected(other)),
    }
}

fn unexpected(response: Response) -> GraphAggError {
    match response {
        Response::Error { message } => GraphAggError::protocol(message),
        other => GraphAggError::protocol(format!("unexpected response {other:?}")),
    }
}
