// src/bin/comention.rs
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use comention_core::cli::{self, Cli, Commands, QueryArgs, TrendArgs};
use comention_core::config::Config;
use comention_core::exit::ComentionExit;

fn main() -> ComentionExit {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("failed to initialise logging: {e}");
    }
    run(&cli).into()
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "comention_core=debug" } else { "comention_core=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    dispatch(&cli.command, &config)
}

fn dispatch(cmd: &Commands, config: &Config) -> Result<()> {
    match cmd {
        Commands::Aggregate {
            input,
            output,
            serial,
        } => cli::handle_aggregate(config, input, output, *serial),
        Commands::Query {
            aggregate,
            from,
            to,
            top_k,
            output,
            format,
            pretty,
        } => cli::handle_query(
            config,
            &QueryArgs {
                aggregate: aggregate.clone(),
                from: *from,
                to: *to,
                top_k: *top_k,
                output: output.clone(),
                format: *format,
                pretty: *pretty,
            },
        ),
        Commands::Span { aggregate } => cli::handle_span(aggregate),
        Commands::Trends {
            input,
            from,
            to,
            n,
            percentage,
            pretty,
        } => cli::handle_trends(
            config,
            &TrendArgs {
                input: input.clone(),
                from: *from,
                to: *to,
                n: *n,
                percentage: *percentage,
                pretty: *pretty,
            },
        ),
    }
}
