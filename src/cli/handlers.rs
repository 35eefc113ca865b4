// src/cli/handlers.rs
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use super::args::QueryFormat;
use crate::aggregate::{aggregate, aggregate_par};
use crate::config::Config;
use crate::ingest::read_observations_from_path;
use crate::merge::PeriodRange;
use crate::encode;
use crate::pipeline::{run_detailed, Query};
use crate::store;
use crate::trends::{top_entities, MentionCounts, TrendMode};
use crate::types::Period;

/// Arguments for the query command.
#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub aggregate: PathBuf,
    pub from: Period,
    pub to: Period,
    pub top_k: Option<i64>,
    pub output: Option<PathBuf>,
    pub format: QueryFormat,
    pub pretty: bool,
}

/// Arguments for the trends command.
#[derive(Debug, Clone)]
pub struct TrendArgs {
    pub input: PathBuf,
    pub from: Period,
    pub to: Period,
    pub n: usize,
    pub percentage: bool,
    pub pretty: bool,
}

/// Reads mention rows, aggregates them and saves the aggregate.
///
/// # Errors
/// Returns error if the input cannot be read or the output cannot be written.
pub fn handle_aggregate(config: &Config, input: &Path, output: &Path, serial: bool) -> Result<()> {
    let (observations, ingest) = read_observations_from_path(input, &config.ingest)
        .with_context(|| format!("reading {}", input.display()))?;

    let (table, stats) = if serial {
        aggregate(&observations)
    } else {
        aggregate_par(&observations)
    };

    store::save(output, &table).with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "{} {} rows ({} kept, {} dropped: {} unresolved, {} not software, {} bad period, {} incomplete, {} bad encoding)",
        "ingested".green().bold(),
        ingest.rows,
        ingest.kept,
        ingest.dropped(),
        ingest.unresolved,
        ingest.curated,
        ingest.malformed_period,
        ingest.missing_field,
        ingest.encoding,
    );
    eprintln!(
        "{} {} documents, {} with pairs, {} pair increments -> {}",
        "aggregated".green().bold(),
        stats.documents,
        stats.documents_paired,
        stats.pair_increments,
        output.display().to_string().cyan()
    );
    if stats.conflicting_periods > 0 {
        eprintln!(
            "{} {} mentions disagreed with their document's period and were counted under the first one",
            "note:".yellow().bold(),
            stats.conflicting_periods
        );
    }
    Ok(())
}

/// Loads an aggregate and writes the encoded network.
///
/// # Errors
/// Returns error on an invalid range or K, or on I/O failure.
pub fn handle_query(config: &Config, args: &QueryArgs) -> Result<()> {
    let k = args
        .top_k
        .unwrap_or_else(|| i64::try_from(config.query.top_k).unwrap_or(i64::MAX));
    let query = Query::new(args.from, args.to, k)?;

    let table = store::load(&args.aggregate)
        .with_context(|| format!("loading {}", args.aggregate.display()))?;
    let out = run_detailed(&table, &query, config);

    match args.format {
        QueryFormat::Network => emit_json(&out.encoded, args.output.as_deref(), args.pretty)?,
        QueryFormat::Sankey => emit_json(&encode::sankey(&out.graph), args.output.as_deref(), args.pretty)?,
    }
    eprintln!(
        "{} {}-{}: {} nodes, {} edges",
        "network".green().bold(),
        query.range.low(),
        query.range.high(),
        out.graph.node_count(),
        out.graph.edge_count()
    );
    Ok(())
}

/// Prints the period span of an aggregate.
///
/// # Errors
/// Returns error if the aggregate cannot be loaded.
pub fn handle_span(aggregate: &Path) -> Result<()> {
    let table = store::load(aggregate).with_context(|| format!("loading {}", aggregate.display()))?;
    match table.span() {
        Some((lo, hi)) => println!("{lo} {hi}"),
        None => eprintln!("{}", "aggregate is empty".yellow()),
    }
    Ok(())
}

/// Reads mention rows and prints the top entities for a range.
///
/// # Errors
/// Returns error on an invalid range or if the input cannot be read.
pub fn handle_trends(config: &Config, args: &TrendArgs) -> Result<()> {
    let range = PeriodRange::new(args.from, args.to)?;
    let (observations, _) = read_observations_from_path(&args.input, &config.ingest)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let counts = MentionCounts::from_observations(&observations);
    let mode = if args.percentage {
        TrendMode::Percentage
    } else {
        TrendMode::Count
    };
    let trends = top_entities(&counts, range, args.n, mode);
    emit_json(&trends, None, args.pretty)
}

fn emit_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_json(BufWriter::new(file), value, pretty)
        }
        None => write_json(io::stdout().lock(), value, pretty),
    }
}

fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
