//! Dataset-specific error types
//!
//! Errors that can occur while locating, reading or parsing dataset files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file does not exist
    #[error("No such file: {}", .0.display())]
    NotFound(PathBuf),

    /// The dataset file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The CSV file is malformed
    #[error("Malformed CSV in {}: {source}", .path.display())]
    Csv {
        /// File being parsed
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// The JSON file is malformed
    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        /// File being parsed
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A column every row depends on is missing from the CSV header
    #[error("Missing column '{column}' in {}", .path.display())]
    MissingColumn {
        /// File being parsed
        path: PathBuf,
        /// Name of the absent column
        column: &'static str,
    },

    /// A dataset name that cannot be mapped onto a file inside the data directory
    #[error("Invalid dataset name: {0:?}")]
    InvalidName(String),
}

impl DatasetError {
    /// Whether the error means the file simply is not there
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatasetError::NotFound(_))
    }
}
