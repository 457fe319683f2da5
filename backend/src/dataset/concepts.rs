//! Concept frequency documents
//!
//! One JSON file per topic, shaped as
//! `{"levels": {"<level>": {"<year>": [{"concept": .., "count": ..}]}}}`.
//! Year keys keep their file order, which the timeline relies on.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Concept frequencies for a single topic
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConceptDocument {
    /// Level key to year map
    #[serde(default)]
    pub levels: Map<String, Value>,
}

impl ConceptDocument {
    /// Look up a level by key
    pub fn level(&self, key: &str) -> Option<LevelConcepts<'_>> {
        self.levels.get(key).map(|value| LevelConcepts {
            years: value.as_object(),
        })
    }
}

/// Year-keyed concept lists of one level
///
/// A level whose value is not an object behaves as a level with no years.
#[derive(Debug, Clone, Copy)]
pub struct LevelConcepts<'a> {
    years: Option<&'a Map<String, Value>>,
}

impl<'a> LevelConcepts<'a> {
    /// Whether the year key exists, whatever its value
    pub fn contains_year(&self, year: &str) -> bool {
        self.years.is_some_and(|years| years.contains_key(year))
    }

    /// Raw value stored under a year key
    pub fn year(&self, year: &str) -> Option<&'a Value> {
        self.years.and_then(|years| years.get(year))
    }

    /// Parsed concept list for a year
    ///
    /// `None` when the year is absent or its value is not a list.
    pub fn entries(&self, year: &str) -> Option<Vec<ConceptEntry>> {
        self.year(year).and_then(ConceptEntry::list)
    }

    /// All year keys with their raw values, in file order
    pub fn years(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.years
            .into_iter()
            .flat_map(|years| years.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// A concept and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptEntry {
    /// Concept label
    pub concept: String,
    /// Occurrence count
    pub count: i64,
}

impl ConceptEntry {
    /// Parse a concept list, keeping its order
    ///
    /// Returns `None` if `value` is not an array. Items without a string
    /// `concept` are dropped; a missing or non-numeric `count` reads as 0.
    pub fn list(value: &Value) -> Option<Vec<ConceptEntry>> {
        let items = value.as_array()?;
        Some(items.iter().filter_map(ConceptEntry::parse).collect())
    }

    /// Parse one list item; `None` unless it has a string `concept`
    pub fn parse(item: &Value) -> Option<ConceptEntry> {
        let concept = item.get("concept")?.as_str()?.to_string();
        let count = item.get("count").map(count_value).unwrap_or(0);
        Some(ConceptEntry { concept, count })
    }
}

fn count_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
