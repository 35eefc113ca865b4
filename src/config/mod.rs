// src/config/mod.rs
pub mod types;

pub use self::types::{Config, EncodingConfig, IngestConfig, LayoutConfig, QueryConfig};

use std::fs;
use std::path::Path;

use crate::error::{ComentionError, Result};

/// Name of the config file picked up from the working directory.
pub const CONFIG_FILE: &str = "comention.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `comention.toml` in the
    /// working directory is used when present, otherwise defaults apply.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, does not parse, or fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::new(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file without validating it.
    ///
    /// # Errors
    /// Returns error on I/O or parse failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ComentionError::io(e, path))?;
        let config = Self::parse_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses TOML content. Missing sections and keys take their defaults.
    ///
    /// # Errors
    /// Returns error if the content is not valid TOML for this schema.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validates configuration.
    ///
    /// # Errors
    /// Returns `ComentionError::Config` describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !self.ingest.delimiter.is_ascii() {
            return Err(invalid(format!("ingest.delimiter {:?} must be ASCII", self.ingest.delimiter)));
        }
        let enc = &self.encoding;
        if !(enc.size_scale.is_finite() && enc.size_scale > 0.0) {
            return Err(invalid(format!("encoding.size_scale must be positive, got {}", enc.size_scale)));
        }
        let max_alpha = enc.min_alpha + enc.alpha_range;
        if !(0.0..=1.0).contains(&enc.min_alpha) || enc.alpha_range < 0.0 || max_alpha > 1.0 {
            return Err(invalid(format!(
                "opacity range [{}, {}] must lie within [0, 1]",
                enc.min_alpha, max_alpha
            )));
        }
        if enc.min_thickness < 0.0 || enc.thickness_range < 0.0 {
            return Err(invalid("edge thickness values must not be negative".to_string()));
        }
        if self.layout.iterations == 0 {
            return Err(invalid("layout.iterations must be at least 1".to_string()));
        }
        if let Some(len) = self.layout.ideal_length {
            if !(len.is_finite() && len > 0.0) {
                return Err(invalid(format!("layout.ideal_length must be positive, got {len}")));
            }
        }
        if !(self.layout.component_gap.is_finite() && self.layout.component_gap > 0.0) {
            return Err(invalid("layout.component_gap must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ComentionError {
    ComentionError::Config(msg)
}
