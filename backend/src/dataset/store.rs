//! File-backed dataset store
//!
//! Resolves dataset files under the configured data directory and parses
//! them on every call.

use super::concepts::ConceptDocument;
use super::error::DatasetError;
use super::sizes::TopicSizeDocument;
use super::tables::{AverageTable, YearTable};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Yearly publication counts per topic
pub const PUBLICATION_COUNT_FILE: &str = "datasetPublicationCount.csv";
/// Yearly growth rates per topic
pub const GROWTH_RATE_FILE: &str = "growthRateOfTopic.csv";
/// Yearly averages per subfield
pub const AVERAGE_COUNT_FILE: &str = "avgPublicationCount.csv";
/// Subfield and topic sizes per year
pub const TOPIC_SIZE_FILE: &str = "topicSizeAndComparison.json";
/// Directory of per-topic concept files
pub const CONCEPTS_DIR: &str = "concepts";

/// Read-only access to the dataset directory
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory this store reads from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load `datasetPublicationCount.csv`
    pub async fn publication_counts(&self) -> Result<YearTable, DatasetError> {
        let path = self.root.join(PUBLICATION_COUNT_FILE);
        let bytes = read(&path).await?;
        YearTable::from_reader(bytes.as_slice(), &path)
    }

    /// Load `growthRateOfTopic.csv`
    pub async fn growth_rates(&self) -> Result<YearTable, DatasetError> {
        let path = self.root.join(GROWTH_RATE_FILE);
        let bytes = read(&path).await?;
        YearTable::from_reader(bytes.as_slice(), &path)
    }

    /// Load `avgPublicationCount.csv`
    pub async fn publication_averages(&self) -> Result<AverageTable, DatasetError> {
        let path = self.root.join(AVERAGE_COUNT_FILE);
        let bytes = read(&path).await?;
        AverageTable::from_reader(bytes.as_slice(), &path)
    }

    /// Load `topicSizeAndComparison.json`
    pub async fn topic_sizes(&self) -> Result<TopicSizeDocument, DatasetError> {
        read_json(&self.root.join(TOPIC_SIZE_FILE)).await
    }

    /// Load the concept file for a topic
    pub async fn concepts(&self, topic_name: &str) -> Result<ConceptDocument, DatasetError> {
        let path = self.concept_path(topic_name)?;
        read_json(&path).await
    }

    /// Path of a topic's concept file
    ///
    /// Rejects names that would resolve outside the concepts directory.
    pub fn concept_path(&self, topic_name: &str) -> Result<PathBuf, DatasetError> {
        let unsafe_name = topic_name.is_empty()
            || topic_name.starts_with('.')
            || topic_name.contains(&['/', '\\', '\0'][..]);
        if unsafe_name {
            return Err(DatasetError::InvalidName(topic_name.to_string()));
        }

        Ok(self
            .root
            .join(CONCEPTS_DIR)
            .join(format!("{}.json", topic_name)))
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, DatasetError> {
    fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let bytes = read(path).await?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}
