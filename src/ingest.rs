// src/ingest.rs
//! Delimited mention records → observations.
//!
//! Rows are filtered by curation state and reduced to `(document, period,
//! entity)`. A row that cannot produce a valid observation is dropped and
//! counted, never fatal. Fields may be quoted the usual CSV way, so a tab or
//! quote inside an entity name survives.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use serde::Serialize;

use crate::config::IngestConfig;
use crate::error::{ComentionError, Result};
use crate::types::{Observation, Period};

/// Why a row did not become an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Entity never resolved to a package.
    Unresolved,
    /// Curation marked the mention as not software.
    Curated,
    /// Publication field has no 4-digit period prefix.
    MalformedPeriod,
    /// Too few fields, or an empty document id or entity.
    MissingField,
    /// A field the row needs is not valid UTF-8.
    Encoding,
}

/// Row accounting for one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows: usize,
    pub kept: usize,
    pub unresolved: usize,
    pub curated: usize,
    pub malformed_period: usize,
    pub missing_field: usize,
    pub encoding: usize,
}

impl IngestStats {
    pub fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::Unresolved => self.unresolved += 1,
            DropReason::Curated => self.curated += 1,
            DropReason::MalformedPeriod => self.malformed_period += 1,
            DropReason::MissingField => self.missing_field += 1,
            DropReason::Encoding => self.encoding += 1,
        }
    }

    #[must_use]
    pub fn dropped(&self) -> usize {
        self.unresolved + self.curated + self.malformed_period + self.missing_field + self.encoding
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    document: usize,
    period: usize,
    entity: usize,
    curation: Option<usize>,
}

impl RecordSchema {
    /// Resolves required columns by name. The curation column is optional.
    ///
    /// # Errors
    /// Returns `MissingColumn` naming the first absent required column.
    pub fn from_header(names: &[&str], config: &IngestConfig) -> Result<Self> {
        let find = |col: &str| names.iter().position(|n| n.trim() == col);
        let require = |col: &str| find(col).ok_or_else(|| ComentionError::MissingColumn(col.to_string()));

        Ok(Self {
            document: require(&config.document_column)?,
            period: require(&config.period_column)?,
            entity: require(&config.entity_column)?,
            curation: find(&config.curation_column),
        })
    }

    /// Turns one record into an observation or a drop reason.
    ///
    /// # Errors
    /// Returns the `DropReason` for rows that are filtered or malformed.
    pub fn parse_record(
        &self,
        record: &ByteRecord,
        config: &IngestConfig,
    ) -> std::result::Result<Observation, DropReason> {
        let field = |idx: usize| {
            record
                .get(idx)
                .map(|raw| std::str::from_utf8(raw).map(str::trim).map_err(|_| DropReason::Encoding))
        };

        let (Some(document), Some(published), Some(entity)) =
            (field(self.document), field(self.period), field(self.entity))
        else {
            return Err(DropReason::MissingField);
        };
        let (document, published, entity) = (document?, published?, entity?);

        if entity == config.unresolved_entity {
            return Err(DropReason::Unresolved);
        }
        if let Some(label) = self.curation.and_then(field) {
            let label = label?;
            if config.excluded_labels.iter().any(|l| l == label) {
                return Err(DropReason::Curated);
            }
        }
        if document.is_empty() || entity.is_empty() {
            return Err(DropReason::MissingField);
        }
        let period = parse_period(published).ok_or(DropReason::MalformedPeriod)?;

        Ok(Observation::new(document, period, entity))
    }
}

/// Derives a period from the first four characters of a publication string.
///
/// `"2010-05-01"` gives 2010. Anything without four leading ASCII digits gives `None`.
#[must_use]
pub fn parse_period(published: &str) -> Option<Period> {
    let prefix = published.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// Reads a header row followed by data rows.
///
/// # Errors
/// Returns error on I/O failure, an empty input, a non-ASCII delimiter, or a
/// header missing a required column.
pub fn read_observations<R: Read>(
    reader: R,
    config: &IngestConfig,
) -> Result<(Vec<Observation>, IngestStats)> {
    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ComentionError::Config(format!("delimiter {:?} is not ASCII", config.delimiter)))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let header = rdr.byte_headers()?.clone();
    let names: Vec<Cow<'_, str>> = header.iter().map(String::from_utf8_lossy).collect();
    let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    let schema = RecordSchema::from_header(&names, config)?;

    let mut observations = Vec::new();
    let mut stats = IngestStats::default();
    let mut record = ByteRecord::new();

    loop {
        let outcome = match rdr.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => schema.parse_record(&record, config),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable row");
                Err(DropReason::MissingField)
            }
        };
        stats.rows += 1;
        match outcome {
            Ok(obs) => {
                stats.kept += 1;
                observations.push(obs);
            }
            Err(reason) => {
                let line = record.position().map(csv::Position::line);
                tracing::debug!(?line, ?reason, "dropping row");
                stats.record(reason);
            }
        }
    }

    tracing::info!(
        rows = stats.rows,
        kept = stats.kept,
        dropped = stats.dropped(),
        "ingested mention records"
    );
    Ok((observations, stats))
}

/// Opens `path` and reads it with [`read_observations`].
///
/// # Errors
/// Returns error if the file cannot be opened or read.
pub fn read_observations_from_path(
    path: &Path,
    config: &IngestConfig,
) -> Result<(Vec<Observation>, IngestStats)> {
    let file = File::open(path).map_err(|e| ComentionError::io(e, path))?;
    read_observations(file, config)
}
