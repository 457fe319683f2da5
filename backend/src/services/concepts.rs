//! Concept services
//!
//! Heatmap, word cloud and timeline views over a topic's concept file.
//! All three resolve the topic file first, then their parameters, then the
//! requested level.

use crate::dataset::{ConceptDocument, ConceptEntry, DatasetError, DatasetStore, LevelConcepts};
use crate::error::AppError;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Number of concepts taken when `top` is not given
pub const DEFAULT_TOP: i64 = 10;

/// Years the heatmap covers, most recent first
pub const HEATMAP_YEARS: [i32; 5] = [2024, 2023, 2022, 2021, 2020];

const INVALID_HEATMAP_PARAMS: &str = "Invalid 'level' or 'top' parameter";
const INVALID_YEAR_PARAMS: &str = "Invalid 'level', 'year', or 'top' parameter";

/// Which concept view is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptView {
    /// Union of top concepts across recent years
    HeatMap,
    /// Top concepts of one year
    WordCloud,
    /// Yearly counts of one year's top concepts
    TimeLine,
}

impl ConceptView {
    /// Parse the `type` query parameter
    pub fn parse(type_: &str) -> Result<Self, AppError> {
        match type_ {
            "heatMap" => Ok(ConceptView::HeatMap),
            "wordCloud" => Ok(ConceptView::WordCloud),
            "timeLine" => Ok(ConceptView::TimeLine),
            other => Err(AppError::UnsupportedType(other.to_string())),
        }
    }
}

/// A concept with its count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptCount {
    /// Concept label
    pub concept: String,
    /// Occurrences
    pub count: i64,
}

impl From<&ConceptEntry> for ConceptCount {
    fn from(entry: &ConceptEntry) -> Self {
        Self {
            concept: entry.concept.clone(),
            count: entry.count,
        }
    }
}

/// One heatmap row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapYear {
    /// Calendar year
    pub year: i32,
    /// Counts in union order
    pub value: Vec<ConceptCount>,
}

/// Heatmap response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    /// Requested topic
    pub topic_name: String,
    /// Requested level
    pub level: String,
    /// Rows, most recent year first
    pub data: Vec<HeatmapYear>,
}

/// Word cloud response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloud {
    /// Requested topic
    pub topic_name: String,
    /// Requested level
    pub level: String,
    /// Requested year
    pub year: i32,
    /// Selected concepts in file order
    pub data: Vec<ConceptCount>,
}

/// Count of a concept in one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    /// Calendar year
    pub year: i32,
    /// Occurrences, 0 when the concept is absent that year
    pub count: i64,
}

/// Timeline of one concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptTimeline {
    /// Concept label
    pub concept: String,
    /// One entry per year of the level, in file order
    pub values: Vec<YearCount>,
}

/// Timeline response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Requested topic
    pub topic_name: String,
    /// Requested level
    pub level: String,
    /// One timeline per selected concept
    pub data: Vec<ConceptTimeline>,
}

/// Any concept response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConceptResponse {
    /// Heatmap view
    Heatmap(Heatmap),
    /// Word cloud view
    WordCloud(WordCloud),
    /// Timeline view
    Timeline(Timeline),
}

/// Slice an ordered list by a signed top-N
///
/// Positive takes from the front, negative from the back, zero keeps
/// everything. Counts larger than the list keep everything.
pub fn select_top<T>(items: &[T], top: i64) -> &[T] {
    let n = usize::try_from(top.unsigned_abs()).unwrap_or(usize::MAX);
    if top > 0 {
        &items[..n.min(items.len())]
    } else if top < 0 {
        &items[items.len().saturating_sub(n)..]
    } else {
        items
    }
}

fn parse_top(top: Option<&str>) -> Option<i64> {
    match top {
        None => Some(DEFAULT_TOP),
        Some(raw) => raw.trim().parse().ok(),
    }
}

/// Load a topic's concept file
pub async fn load_concepts(store: &DatasetStore, name: &str) -> Result<ConceptDocument, AppError> {
    store.concepts(name).await.map_err(|err| match err {
        DatasetError::NotFound(_) | DatasetError::InvalidName(_) => {
            tracing::debug!(topic = %name, error = %err, "No concept file for topic");
            AppError::NotFound(format!("No concept data found for topic '{}'", name))
        }
        other => {
            tracing::warn!(topic = %name, error = %other, "Failed to read concept file");
            AppError::DatasetUnavailable(format!("Failed to read concept data: {}", other))
        }
    })
}

fn find_level<'a>(
    document: &'a ConceptDocument,
    name: &str,
    level: &str,
) -> Result<LevelConcepts<'a>, AppError> {
    document.level(level).ok_or_else(|| {
        AppError::NotFound(format!("Level {} not found for topic '{}'", level, name))
    })
}

/// Answer a heatmap request
pub async fn get_heatmap(
    store: &DatasetStore,
    name: &str,
    level: &str,
    top: Option<&str>,
) -> Result<Heatmap, AppError> {
    let document = load_concepts(store, name).await?;
    build_heatmap(&document, name, level, top)
}

/// Build the heatmap of a loaded concept file
///
/// The concept axis is the union of each year's first `top` concepts in
/// first-seen order. Every row carries a count for every concept in the
/// union, 0 where the concept does not appear that year.
pub fn build_heatmap(
    document: &ConceptDocument,
    name: &str,
    level: &str,
    top: Option<&str>,
) -> Result<Heatmap, AppError> {
    let n_top = parse_top(top)
        .ok_or_else(|| AppError::InvalidParameter(INVALID_HEATMAP_PARAMS.to_string()))?;
    if n_top <= 0 {
        return Err(AppError::InvalidParameter(
            "'top' must be a positive integer".to_string(),
        ));
    }
    let years = find_level(document, name, level)?;

    let mut union: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<(i32, Vec<ConceptEntry>)> = Vec::new();

    for year in HEATMAP_YEARS {
        let key = year.to_string();
        if !years.contains_year(&key) {
            continue;
        }
        // Present but empty or not a list: the row is kept with zero counts.
        let raw = years
            .year(&key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        // Malformed items still take up one of the `top` slots.
        for entry in select_top(raw, n_top).iter().filter_map(ConceptEntry::parse) {
            if seen.insert(entry.concept.clone()) {
                union.push(entry.concept);
            }
        }
        let entries = years.entries(&key).unwrap_or_default();
        rows.push((year, entries));
    }

    let data = rows
        .into_iter()
        .map(|(year, entries)| {
            let counts: HashMap<&str, i64> = entries
                .iter()
                .map(|e| (e.concept.as_str(), e.count))
                .collect();
            HeatmapYear {
                year,
                value: union
                    .iter()
                    .map(|concept| ConceptCount {
                        concept: concept.clone(),
                        count: counts.get(concept.as_str()).copied().unwrap_or(0),
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(Heatmap {
        topic_name: name.to_string(),
        level: level.to_string(),
        data,
    })
}

/// Answer a word cloud request
pub async fn get_word_cloud(
    store: &DatasetStore,
    name: &str,
    level: &str,
    year: &str,
    top: Option<&str>,
) -> Result<WordCloud, AppError> {
    let document = load_concepts(store, name).await?;
    build_word_cloud(&document, name, level, year, top)
}

/// Build the word cloud of a loaded concept file
pub fn build_word_cloud(
    document: &ConceptDocument,
    name: &str,
    level: &str,
    year: &str,
    top: Option<&str>,
) -> Result<WordCloud, AppError> {
    let invalid = || AppError::InvalidParameter(INVALID_YEAR_PARAMS.to_string());
    let top = parse_top(top).ok_or_else(invalid)?;
    let year_number: i32 = year.trim().parse().map_err(|_| invalid())?;

    let years = find_level(document, name, level)?;
    if !years.contains_year(year) {
        return Err(AppError::NotFound(format!(
            "No data for year {} at level {} in topic '{}'",
            year, level, name
        )));
    }

    let entries = years.entries(year).unwrap_or_default();
    let data = select_top(&entries, top)
        .iter()
        .map(ConceptCount::from)
        .collect();

    Ok(WordCloud {
        topic_name: name.to_string(),
        level: level.to_string(),
        year: year_number,
        data,
    })
}

/// Answer a timeline request
pub async fn get_timeline(
    store: &DatasetStore,
    name: &str,
    level: &str,
    year: &str,
    top: Option<&str>,
) -> Result<Timeline, AppError> {
    let document = load_concepts(store, name).await?;
    build_timeline(&document, name, level, year, top)
}

/// Build the timeline of a loaded concept file
///
/// Concepts are picked from `year`; their counts are then traced over every
/// year of the level in file order.
pub fn build_timeline(
    document: &ConceptDocument,
    name: &str,
    level: &str,
    year: &str,
    top: Option<&str>,
) -> Result<Timeline, AppError> {
    let top = parse_top(top)
        .ok_or_else(|| AppError::InvalidParameter(INVALID_YEAR_PARAMS.to_string()))?;
    let years = find_level(document, name, level)?;

    let selected_year = years
        .entries(year)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No concept data for year {} at level {}",
                year, level
            ))
        })?;

    let history: Vec<(i32, Vec<ConceptEntry>)> = years
        .years()
        .filter_map(|(key, value)| {
            let year = key.trim().parse().ok()?;
            Some((year, ConceptEntry::list(value).unwrap_or_default()))
        })
        .collect();

    let data = select_top(&selected_year, top)
        .iter()
        .map(|entry| ConceptTimeline {
            concept: entry.concept.clone(),
            values: history
                .iter()
                .map(|(year, entries)| YearCount {
                    year: *year,
                    count: entries
                        .iter()
                        .find(|e| e.concept == entry.concept)
                        .map(|e| e.count)
                        .unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    Ok(Timeline {
        topic_name: name.to_string(),
        level: level.to_string(),
        data,
    })
}
