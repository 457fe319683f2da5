//! Dataset module
//!
//! File-backed access to the pre-computed publication, growth, size and
//! concept datasets. Every read goes to disk; nothing is cached between
//! requests.

pub mod concepts;
pub mod error;
pub mod sizes;
pub mod store;
pub mod tables;

pub use concepts::{ConceptDocument, ConceptEntry, LevelConcepts};
pub use error::DatasetError;
pub use sizes::{SubFieldSize, TopicSizeDocument, YearSizes};
pub use store::DatasetStore;
pub use tables::{AverageRow, AverageTable, TopicSeries, YearTable};
