// tests/unit_ingest.rs
use std::fs;

use comention_core::aggregate::aggregate;
use comention_core::config::IngestConfig;
use comention_core::ingest::{read_observations, read_observations_from_path};
use comention_core::{ComentionError, Observation, PairKey};
use tempfile::tempdir;

const SAMPLE: &str = "\
doi\tpubdate\tsoftware\tmapped_to_software\tcuration_label
10.1/a\t2010-03-01\tSPSS\tSPSS\tsoftware
10.1/a\t2010-03-01\tnumpy\tnumpy\tsoftware
10.1/a\t2010-03-01\tExcel\tExcel\tnot_software
10.1/b\t2011\tR\tR\tsoftware
10.1/b\t2011\tstuff\tnot_disambiguated\tsoftware

10.1/c\tunknown\tR\tR\tsoftware
10.1/d\t2012-01-01
";

#[test]
fn test_in_memory_stats() {
    let (obs, stats) = read_observations(SAMPLE.as_bytes(), &IngestConfig::default()).unwrap();
    assert_eq!(
        obs,
        vec![
            Observation::new("10.1/a", 2010, "SPSS"),
            Observation::new("10.1/a", 2010, "numpy"),
            Observation::new("10.1/b", 2011, "R"),
        ]
    );
    assert_eq!(stats.rows, 7);
    assert_eq!(stats.kept, 3);
    assert_eq!(stats.curated, 1);
    assert_eq!(stats.unresolved, 1);
    assert_eq!(stats.malformed_period, 1);
    assert_eq!(stats.missing_field, 1);
    assert_eq!(stats.dropped() + stats.kept, stats.rows);
}

#[test]
fn test_file_feeds_aggregation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mentions.tsv");
    fs::write(&path, SAMPLE).unwrap();

    let (obs, _) = read_observations_from_path(&path, &IngestConfig::default()).unwrap();
    let (table, stats) = aggregate(&obs);
    assert_eq!(stats.documents, 2);
    assert_eq!(table.count(2010, &PairKey::new("numpy", "SPSS").unwrap()), 1);
    assert_eq!(table.span(), Some((2010, 2011)));
}

#[test]
fn test_custom_delimiter_and_columns() {
    let config = IngestConfig {
        document_column: "paper".to_string(),
        period_column: "year".to_string(),
        entity_column: "tool".to_string(),
        delimiter: ',',
        ..IngestConfig::default()
    };
    let input = "tool,paper,year\nImageJ,p1,2015\nFiji,p1,2015\n";
    let (obs, stats) = read_observations(input.as_bytes(), &config).unwrap();
    assert_eq!(stats.kept, 2);
    assert_eq!(obs[0], Observation::new("p1", 2015, "ImageJ"));
}

#[test]
fn test_missing_required_column() {
    let input = "doi\tpubdate\n10.1/a\t2010\n";
    let err = read_observations(input.as_bytes(), &IngestConfig::default()).unwrap_err();
    assert!(matches!(err, ComentionError::MissingColumn(ref c) if c == "mapped_to_software"));
    assert!(err.is_invalid_input());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = read_observations_from_path(&dir.path().join("nope.tsv"), &IngestConfig::default())
        .unwrap_err();
    assert!(matches!(err, ComentionError::Io { .. }));
}

#[test]
fn test_file_with_bad_bytes_and_quotes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mentions.tsv");
    let mut bytes = b"doi\tpubdate\tmapped_to_software\n".to_vec();
    bytes.extend_from_slice(b"p1\t2015\t\"Graph\tPad\"\n");
    bytes.extend_from_slice(b"p1\t2015\tPrism\xc3\n");
    bytes.extend_from_slice(b"p1\t2015\tPrism\n");
    fs::write(&path, bytes).unwrap();

    let (obs, stats) = read_observations_from_path(&path, &IngestConfig::default()).unwrap();
    assert_eq!(stats.rows, 3);
    assert_eq!(stats.kept, 2);
    assert_eq!(stats.encoding, 1);

    let (table, _) = aggregate(&obs);
    assert_eq!(table.count(2015, &PairKey::new("Graph\tPad", "Prism").unwrap()), 1);
}
