use std::{env, process, sync::Arc};

use graphagg::{
    GraphAggError,
    cli::handle_command,
    config::{CommandLineConfig, ServiceConfig},
    coordinator::Coordinator,
    transport::Server,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let cli = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    let config = match ServiceConfig::from_process_env(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .init();

    if let Err(err) = run(&config, &cli) {
        eprintln!("command failed: {err}");
        process::exit(exit_code(&err));
    }
}

fn run(config: &ServiceConfig, cli: &CommandLineConfig) -> Result<(), GraphAggError> {
    if cli.command == "serve" {
        let server = Server::bind(config.listen_addr, Arc::new(Coordinator::new()))?;
        return server.serve();
    }
    match handle_command(config, &cli.command, &cli.command_args)? {
        Some(output) => {
            println!("{output}");
            Ok(())
        }
        None => Err(GraphAggError::invalid_input(format!(
            "unknown command {}",
            cli.command
        ))),
    }
}

fn exit_code(err: &GraphAggError) -> i32 {
    match err {
        GraphAggError::InvalidInput(_) | GraphAggError::Config(_) => 2,
        _ => 1,
    }
}
