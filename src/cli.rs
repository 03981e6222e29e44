use serde_json::{Map, Value, json};

use crate::{
    config::ServiceConfig,
    errors::GraphAggError,
    generators::{GraphShape, generate_graph, split_round_robin},
    graph::AdjacencyMap,
    stream::GraphFragment,
    transport::Client,
};

const ERR_PREFIX: &str = "cli";

/// Runs a client-side command and returns its JSON output, or `None` when the
/// command is not one of ours.
pub fn handle_command(
    config: &ServiceConfig,
    command: &str,
    args: &[String],
) -> Result<Option<String>, GraphAggError> {
    match command {
        "submit" => run_submit(config, args).map(Some),
        "query-independent-set" => run_query_independent_set(config, args).map(Some),
        "query-matching" => run_query_matching(config, args).map(Some),
        "generate" => run_generate(args).map(Some),
        "status" => run_status(config).map(Some),
        _ => Ok(None),
    }
}

fn run_submit(config: &ServiceConfig, args: &[String]) -> Result<String, GraphAggError> {
    let client_id = parse_required_i64(args, "--client")?;
    let graph = graph_from_args(args)?;
    let parts = parse_optional_usize(args, "--parts")?.unwrap_or(1);
    let vertices = graph.len();
    let mut client = Client::connect(config.listen_addr)?;
    let response = if parts > 1 {
        let mut fragments = split_round_robin(&graph, parts).into_iter();
        let first = fragments
            .next()
            .map(|part| GraphFragment::first(client_id, part))
            .into_iter();
        client.submit_stream(first.chain(fragments.map(GraphFragment::continuation)))?
    } else {
        client.submit_graph(client_id, graph)?
    };
    let mut object = Map::new();
    object.insert("command".into(), Value::String("submit".into()));
    object.insert("client_id".into(), json!(client_id));
    object.insert("vertices".into(), json!(vertices));
    object.insert("parts".into(), json!(parts));
    object.insert("success".into(), json!(response.success));
    object.insert("message".into(), Value::String(response.message));
    encode(object)
}

fn run_query_independent_set(
    config: &ServiceConfig,
    args: &[String],
) -> Result<String, GraphAggError> {
    let k = parse_required_i64(args, "--k")?;
    let response = Client::connect(config.listen_addr)?.has_independent_set(k)?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("query-independent-set".into()));
    object.insert("k".into(), json!(k));
    object.insert("result".into(), json!(response.result));
    object.insert("message".into(), Value::String(response.message));
    encode(object)
}

fn run_query_matching(config: &ServiceConfig, args: &[String]) -> Result<String, GraphAggError> {
    let k = parse_required_i64(args, "--k")?;
    let response = Client::connect(config.listen_addr)?.has_matching(k)?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("query-matching".into()));
    object.insert("k".into(), json!(k));
    object.insert("result".into(), json!(response.result));
    object.insert("message".into(), Value::String(response.message));
    encode(object)
}

fn run_generate(args: &[String]) -> Result<String, GraphAggError> {
    let graph = graph_from_args(args)?;
    let mut entries: Vec<_> = graph.into_iter().collect();
    entries.sort_by_key(|(vertex, _)| *vertex);
    let adjacency = entries
        .into_iter()
        .map(|(vertex, neighbors)| (vertex.to_string(), json!(neighbors)))
        .collect::<Map<String, Value>>();
    let mut object = Map::new();
    object.insert("command".into(), Value::String("generate".into()));
    object.insert("adjacency".into(), Value::Object(adjacency));
    encode(object)
}

fn run_status(config: &ServiceConfig) -> Result<String, GraphAggError> {
    let (submitters, vertices) = Client::connect(config.listen_addr)?.status()?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("status".into()));
    object.insert("submitters".into(), json!(submitters));
    object.insert("vertices".into(), json!(vertices));
    encode(object)
}

fn graph_from_args(args: &[String]) -> Result<AdjacencyMap, GraphAggError> {
    let name = required_value(args, "--shape")?;
    let edges = parse_optional_usize(args, "--edges")?.unwrap_or(0);
    let left = parse_optional_usize(args, "--left")?.unwrap_or(0);
    let right = parse_optional_usize(args, "--right")?.unwrap_or(0);
    let shape = GraphShape::parse(&name, edges, left, right)
        .ok_or_else(|| invalid(format!("unknown shape {name}")))?;
    let vertices = match shape {
        GraphShape::Bipartite { .. } => 0,
        _ => parse_optional_usize(args, "--vertices")?
            .ok_or_else(|| invalid("missing --vertices"))?,
    };
    let seed = parse_optional_usize(args, "--seed")?.unwrap_or(42) as u64;
    Ok(generate_graph(shape, vertices, seed))
}

fn parse_required_i64(args: &[String], flag: &str) -> Result<i64, GraphAggError> {
    let value = required_value(args, flag)?;
    value
        .parse::<i64>()
        .map_err(|_| invalid(format!("{flag} expects an integer")))
}

fn parse_optional_usize(args: &[String], flag: &str) -> Result<Option<usize>, GraphAggError> {
    match value(args, flag) {
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| invalid(format!("{flag} expects a non-negative integer"))),
        None => Ok(None),
    }
}

fn required_value(args: &[String], flag: &str) -> Result<String, GraphAggError> {
    value(args, flag).ok_or_else(|| invalid(format!("missing {flag}")))
}

fn value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().cloned();
        }
    }
    None
}

fn encode(object: Map<String, Value>) -> Result<String, GraphAggError> {
    serde_json::to_string(&Value::Object(object))
        .map_err(|e| invalid(format!("{ERR_PREFIX} serialization failed: {e}")))
}

fn invalid<T: Into<String>>(message: T) -> GraphAggError {
    GraphAggError::invalid_input(message.into())
}
