// src/config/types.rs
use serde::{Deserialize, Serialize};

/// Column layout of the delimited mention file and the curation filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_document_column")]
    pub document_column: String,
    #[serde(default = "default_period_column")]
    pub period_column: String,
    #[serde(default = "default_entity_column")]
    pub entity_column: String,
    #[serde(default = "default_curation_column")]
    pub curation_column: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Entity value marking a mention that was never resolved to a package.
    #[serde(default = "default_unresolved_entity")]
    pub unresolved_entity: String,
    /// Curation labels whose rows are noise rather than real software.
    #[serde(default = "default_excluded_labels")]
    pub excluded_labels: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            document_column: default_document_column(),
            period_column: default_period_column(),
            entity_column: default_entity_column(),
            curation_column: default_curation_column(),
            delimiter: default_delimiter(),
            unresolved_entity: default_unresolved_entity(),
            excluded_labels: default_excluded_labels(),
        }
    }
}

fn default_document_column() -> String { "doi".to_string() }
fn default_period_column() -> String { "pubdate".to_string() }
fn default_entity_column() -> String { "mapped_to_software".to_string() }
fn default_curation_column() -> String { "curation_label".to_string() }
fn default_delimiter() -> char { '\t' }
fn default_unresolved_entity() -> String { "not_disambiguated".to_string() }
fn default_excluded_labels() -> Vec<String> { vec!["not_software".to_string()] }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { top_k: default_top_k() }
    }
}

fn default_top_k() -> usize { 100 }

/// Tunables for node size, edge opacity/thickness and labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Multiplier on `sqrt(total_weight)`.
    #[serde(default = "default_size_scale")]
    pub size_scale: f64,
    #[serde(default = "default_min_alpha")]
    pub min_alpha: f64,
    #[serde(default = "default_alpha_range")]
    pub alpha_range: f64,
    #[serde(default = "default_min_thickness")]
    pub min_thickness: f64,
    #[serde(default = "default_thickness_range")]
    pub thickness_range: f64,
    /// Only the first N nodes carry a text label.
    #[serde(default = "default_label_limit")]
    pub label_limit: usize,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            size_scale: default_size_scale(),
            min_alpha: default_min_alpha(),
            alpha_range: default_alpha_range(),
            min_thickness: default_min_thickness(),
            thickness_range: default_thickness_range(),
            label_limit: default_label_limit(),
        }
    }
}

fn default_size_scale() -> f64 { 0.2 }
fn default_min_alpha() -> f64 { 0.1 }
fn default_alpha_range() -> f64 { 0.7 }
fn default_min_thickness() -> f64 { 1.0 }
fn default_thickness_range() -> f64 { 9.0 }
fn default_label_limit() -> usize { 75 }

/// Force-directed layout parameters. Identical parameters and an identical
/// graph always give identical coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Seeds the jitter applied to the initial circle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Horizontal gap between packed components, in units of the ideal edge length.
    #[serde(default = "default_component_gap")]
    pub component_gap: f64,
    /// Ideal edge length. Defaults to 1.0 when unset.
    #[serde(default)]
    pub ideal_length: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            seed: default_seed(),
            component_gap: default_component_gap(),
            ideal_length: None,
        }
    }
}

fn default_iterations() -> usize { 300 }
fn default_seed() -> u64 { 0x5EED }
fn default_component_gap() -> f64 { 1.0 }

/// Shape of `comention.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}
