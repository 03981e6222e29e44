use std::net::SocketAddr;

use crate::errors::GraphAggError;

pub const DEFAULT_LOG_FILTER: &str = "info";
pub const ENV_ADDR: &str = "GRAPHAGG_ADDR";
pub const ENV_LOG: &str = "GRAPHAGG_LOG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 50051)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults, overridden by the environment, overridden by command-line flags.
    pub fn resolve<F>(cli: &CommandLineConfig, env: F) -> Result<Self, GraphAggError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServiceConfig::default();
        if let Some(addr) = env(ENV_ADDR) {
            config.listen_addr = parse_addr(&addr)?;
        }
        if let Some(filter) = env(ENV_LOG) {
            config.log_filter = filter;
        }
        if let Some(addr) = &cli.addr {
            config.listen_addr = parse_addr(addr)?;
        }
        if let Some(filter) = &cli.log_filter {
            config.log_filter = filter.clone();
        }
        Ok(config)
    }

    pub fn from_process_env(cli: &CommandLineConfig) -> Result<Self, GraphAggError> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr, GraphAggError> {
    value
        .parse()
        .map_err(|_| GraphAggError::config(format!("invalid listen address {value}")))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub addr: Option<String>,
    pub log_filter: Option<String>,
    pub command: String,
    pub command_args: Vec<String>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut addr = None;
        let mut log_filter = None;
        let mut command = String::from("status");
        let mut command_args = Vec::new();
        let mut command_set = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if command_set {
                command_args.push(arg.to_string());
                continue;
            }
            match *arg {
                "--addr" => {
                    addr = Some(
                        iter.next()
                            .ok_or_else(|| "--addr requires a value".to_string())?
                            .to_string(),
                    );
                }
                "--log" => {
                    log_filter = Some(
                        iter.next()
                            .ok_or_else(|| "--log requires a value".to_string())?
                            .to_string(),
                    );
                }
                "--command" => {
                    command = iter
                        .next()
                        .ok_or_else(|| "--command requires a value".to_string())?
                        .to_string();
                    command_set = true;
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    command = arg.to_string();
                    command_set = true;
                }
            }
        }
        Ok(Self {
            addr,
            log_filter,
            command,
            command_args,
        })
    }

    pub fn help() -> &'static str {
        "Usage: graphagg [--addr HOST:PORT] [--log FILTER] <command> [args]\n\
         Commands:\n\
         \x20 serve\n\
         \x20 submit --client ID --shape SHAPE --vertices N [--seed S] [--edges E] [--left L --right R] [--parts P]\n\
         \x20 query-independent-set --k K\n\
         \x20 query-matching --k K\n\
         \x20 generate --shape SHAPE --vertices N [--seed S] [--edges E] [--left L --right R]\n\
         \x20 status\n\
         Shapes: random, complete, star, cycle, path, bipartite\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_before_command_are_global() {
        let cfg = CommandLineConfig::from_args(&[
            "graphagg",
            "--addr",
            "127.0.0.1:9000",
            "query-matching",
            "--k",
            "2",
        ])
        .expect("parse");
        assert_eq!(cfg.addr.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(cfg.command, "query-matching");
        assert_eq!(cfg.command_args, vec!["--k", "2"]);
    }

    #[test]
    fn cli_overrides_env_overrides_default() {
        let cli = CommandLineConfig::from_args(&["graphagg", "--log", "debug", "serve"])
            .expect("parse");
        let env = |key: &str| match key {
            ENV_ADDR => Some("0.0.0.0:6000".to_string()),
            ENV_LOG => Some("warn".to_string()),
            _ => None,
        };
        let config = ServiceConfig::resolve(&cli, env).expect("config");
        assert_eq!(config.listen_addr.port(), 6000);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn bad_address_is_a_config_error() {
        let cli = CommandLineConfig::from_args(&["graphagg", "--addr", "nowhere", "serve"])
            .expect("parse");
        let err = ServiceConfig::resolve(&cli, |_| None).unwrap_err();
        assert!(matches!(err, GraphAggError::Config(_)));
    }
}
