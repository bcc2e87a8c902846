use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "UniformGrade";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the optional engine config inside the data directory.
pub const CONFIG_FILE_NAME: &str = "grader.json";

/// Get the application data directory: ~/UniformGrade/
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// SQLite database holding students and grades
pub fn database_path() -> PathBuf {
    app_data_dir().join("grades.db")
}

/// Root directory for stored uniform photos
pub fn photos_dir() -> PathBuf {
    app_data_dir().join("photos")
}

pub fn config_path() -> PathBuf {
    app_data_dir().join(CONFIG_FILE_NAME)
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "uniform_grade=info,warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Limits applied to uploaded photos before and during scanning.
///
/// Every field is optional in `grader.json`; missing fields keep defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Smallest plausible encoded image (smallest valid PNG is ~67 bytes).
    pub min_image_bytes: usize,
    /// Upload size cap in bytes.
    pub max_image_bytes: usize,
    /// Decoding is refused if either side exceeds this many pixels.
    pub max_decode_dimension: u32,
    /// Longest side is downscaled to this before pixel scanning; 0 scans
    /// the decoded pixels unchanged.
    pub max_scan_dimension: u32,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            min_image_bytes: 67,
            max_image_bytes: 25 * 1024 * 1024,
            max_decode_dimension: 12_000,
            max_scan_dimension: 0,
        }
    }
}

impl GraderConfig {
    /// Load from a JSON file. A missing file yields defaults; a present but
    /// unreadable or invalid file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No grader config, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Loaded grader config");
        Ok(config)
    }
}
