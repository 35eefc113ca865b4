// src/store.rs
//! Persisted aggregate: the precompute/serve handoff.
//!
//! Format: a JSON object keyed by period, each holding a list of
//! `{"Source": .., "Target": .., "Count": ..}` records. Writing is
//! byte-stable: periods ascend, records sort by canonical pair.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ComentionError, Result};
use crate::table::PeriodCountTable;
use crate::types::{PairKey, Period};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

type Document = BTreeMap<String, Vec<PairRecord>>;

/// Converts a table to its serializable shape.
#[must_use]
pub fn to_records(table: &PeriodCountTable) -> BTreeMap<Period, Vec<PairRecord>> {
    table
        .periods()
        .map(|period| {
            let mut pairs: Vec<(&PairKey, u64)> = table
                .period(period)
                .map(|m| m.iter().map(|(p, c)| (p, *c)).collect())
                .unwrap_or_default();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            let records = pairs
                .into_iter()
                .map(|(pair, count)| PairRecord {
                    source: pair.first().to_string(),
                    target: pair.second().to_string(),
                    count,
                })
                .collect();
            (period, records)
        })
        .collect()
}

/// Rebuilds a table from records.
///
/// Source/Target may come in either order; duplicates of one pair are summed
/// and zero counts are skipped.
///
/// # Errors
/// Returns `MalformedAggregate` for a non-integer period key or a record
/// pairing an entity with itself.
pub fn from_records(doc: Document) -> Result<PeriodCountTable> {
    let mut table = PeriodCountTable::new();
    for (key, records) in doc {
        let period: Period = key
            .trim()
            .parse()
            .map_err(|_| ComentionError::MalformedAggregate(format!("period key '{key}' is not an integer")))?;
        table.touch(period);
        for rec in records {
            let pair = PairKey::new(rec.source.as_str(), rec.target.as_str()).ok_or_else(|| {
                ComentionError::MalformedAggregate(format!(
                    "period {period}: '{}' is paired with itself",
                    rec.source
                ))
            })?;
            table.add(period, pair, rec.count);
        }
    }
    Ok(table)
}

/// # Errors
/// Returns error if serialization or the write fails.
pub fn write_table<W: Write>(writer: W, table: &PeriodCountTable, pretty: bool) -> Result<()> {
    // integer map keys serialize as JSON strings, in numeric order
    let doc = to_records(table);
    if pretty {
        serde_json::to_writer_pretty(writer, &doc)?;
    } else {
        serde_json::to_writer(writer, &doc)?;
    }
    Ok(())
}

/// # Errors
/// Returns error if the JSON is invalid or the content is malformed.
pub fn read_table<R: Read>(reader: R) -> Result<PeriodCountTable> {
    let doc: Document = serde_json::from_reader(reader)?;
    from_records(doc)
}

/// # Errors
/// Returns error if the file cannot be created or written.
pub fn save(path: &Path, table: &PeriodCountTable) -> Result<()> {
    let file = File::create(path).map_err(|e| ComentionError::io(e, path))?;
    let mut writer = BufWriter::new(file);
    write_table(&mut writer, table, false)?;
    writer.flush().map_err(|e| ComentionError::io(e, path))?;
    tracing::info!(path = %path.display(), entries = table.entry_count(), "saved aggregate");
    Ok(())
}

/// # Errors
/// Returns error if the file cannot be read or its content is malformed.
pub fn load(path: &Path) -> Result<PeriodCountTable> {
    let file = File::open(path).map_err(|e| ComentionError::io(e, path))?;
    let table = read_table(BufReader::new(file))?;
    if table.is_empty() {
        tracing::warn!(path = %path.display(), "aggregate has no periods");
    }
    tracing::info!(path = %path.display(), entries = table.entry_count(), "loaded aggregate");
    Ok(table)
}
