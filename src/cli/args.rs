// src/cli/args.rs
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::types::Period;

#[derive(Parser)]
#[command(name = "comention", version, about = "Software co-mention networks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Config file (defaults to ./comention.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count co-mentions per period from a delimited mention file
    Aggregate {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Where to write the aggregate JSON
        #[arg(long, short, value_name = "FILE")]
        output: PathBuf,
        /// Aggregate on one thread
        #[arg(long)]
        serial: bool,
    },
    /// Build the encoded network for a period range from a saved aggregate
    Query {
        #[arg(value_name = "AGGREGATE")]
        aggregate: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        from: Period,
        #[arg(long, allow_negative_numbers = true)]
        to: Period,
        /// Number of heaviest connections to keep (defaults to query.top_k)
        #[arg(long = "top", short = 'k', allow_negative_numbers = true)]
        top_k: Option<i64>,
        /// Write JSON here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Payload shape
        #[arg(long, value_enum, default_value_t = QueryFormat::Network)]
        format: QueryFormat,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the first and last period of a saved aggregate
    Span {
        #[arg(value_name = "AGGREGATE")]
        aggregate: PathBuf,
    },
    /// Most mentioned entities and their per-period series
    Trends {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        from: Period,
        #[arg(long, allow_negative_numbers = true)]
        to: Period,
        #[arg(long, short, default_value = "20")]
        n: usize,
        /// Report each period as a share of all mentions
        #[arg(long)]
        percentage: bool,
        #[arg(long)]
        pretty: bool,
    },
}

/// What `query` emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueryFormat {
    /// Positioned nodes and styled edges
    #[default]
    Network,
    /// Node names and index-linked flows
    Sankey,
}
