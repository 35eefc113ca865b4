// src/error.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::Period;

#[derive(Debug, Error)]
pub enum ComentionError {
    #[error("invalid period range: low {low} is after high {high}")]
    InvalidRange { low: Period, high: Period },

    #[error("invalid top-K value {0}: K must be zero or positive")]
    InvalidTopK(i64),

    #[error("input header is missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed aggregate: {0}")]
    MalformedAggregate(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("delimited input error: {0}")]
    Csv(#[from] csv::Error),
}

impl ComentionError {
    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            path: path.to_path_buf(),
        }
    }

    /// True for errors caused by caller-supplied query or input values rather
    /// than by the environment.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::InvalidTopK(_)
                | Self::MissingColumn(_)
                | Self::MalformedAggregate(_)
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ComentionError>;

// Allow `?` on std::io::Error by converting to ComentionError::Io with unknown path.
impl From<std::io::Error> for ComentionError {
    fn from(source: std::io::Error) -> Self {
        ComentionError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
