//! Sub-field detail service
//!
//! Trend lines (publication counts, growth rates) for every topic of a
//! subfield, and the subfield's size breakdown per year.

use super::unavailable;
use crate::dataset::{DatasetStore, TopicSizeDocument, YearTable};
use crate::error::AppError;
use serde::Serialize;
use serde_json::Value;

/// Which sub-field view is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubFieldView {
    /// Yearly publication counts per topic
    Count,
    /// Yearly growth rates per topic
    Growth,
    /// Subfield size and topic breakdown per year
    Size,
}

impl SubFieldView {
    /// Parse the `type` query parameter
    pub fn parse(type_: &str) -> Result<Self, AppError> {
        match type_ {
            "count" => Ok(SubFieldView::Count),
            "growth" => Ok(SubFieldView::Growth),
            "size" => Ok(SubFieldView::Size),
            other => Err(AppError::UnsupportedType(other.to_string())),
        }
    }
}

/// One year of a topic's series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearValue {
    /// Calendar year
    pub year: i32,
    /// Count or rate for that year
    pub value: f64,
}

/// Yearly series of one topic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicValues {
    /// Topic name
    pub topic_name: String,
    /// Topic identifier
    pub topic_id: Value,
    /// Filled-in years, in column order
    pub values: Vec<YearValue>,
}

/// Response for `type=count` and `type=growth`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubFieldSeries {
    /// Requested subfield
    pub sub_field_name: String,
    /// Identifier taken from the subfield's first row
    pub sub_field_id: Value,
    /// One series per topic, in file order
    pub data: Vec<TopicValues>,
}

/// Subfield measurements for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeMeasurement {
    /// Total publications in the subfield
    pub sub_field_publication_count: Value,
    /// Per-topic breakdown, passed through from the dataset
    pub topic_data: Value,
}

/// Size entry for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSize {
    /// Year as written in the dataset
    pub year: Value,
    /// Measurements of the requested subfield
    pub sub_fields: Vec<SizeMeasurement>,
}

/// Response for `type=size`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubFieldSizes {
    /// Requested subfield
    pub sub_field_name: String,
    /// Entries in document order
    pub data: Vec<YearSize>,
}

/// Any sub-field detail response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubFieldDetail {
    /// Count or growth series
    Series(SubFieldSeries),
    /// Size breakdown
    Sizes(SubFieldSizes),
}

/// Answer a sub-field detail request
pub async fn get_sub_field_detail(
    store: &DatasetStore,
    name: &str,
    type_: &str,
) -> Result<SubFieldDetail, AppError> {
    match SubFieldView::parse(type_)? {
        SubFieldView::Count => {
            let table = store
                .publication_counts()
                .await
                .map_err(unavailable("Failed to load dataset"))?;
            series_for(&table, name).map(SubFieldDetail::Series)
        }
        SubFieldView::Growth => {
            let table = store
                .growth_rates()
                .await
                .map_err(unavailable("Failed to load dataset"))?;
            series_for(&table, name).map(SubFieldDetail::Series)
        }
        SubFieldView::Size => {
            let document = store
                .topic_sizes()
                .await
                .map_err(unavailable("Failed to read size JSON"))?;
            sizes_for(&document, name).map(SubFieldDetail::Sizes)
        }
    }
}

/// Collect every topic series of a subfield
pub fn series_for(table: &YearTable, sub_field_name: &str) -> Result<SubFieldSeries, AppError> {
    let rows: Vec<_> = table.rows_for_sub_field(sub_field_name).collect();
    let first = rows.first().ok_or_else(|| no_sub_field(sub_field_name))?;

    let data = rows
        .iter()
        .map(|row| TopicValues {
            topic_name: row.topic_name.clone(),
            topic_id: row.topic_id.clone(),
            values: row
                .present_values()
                .map(|(year, value)| YearValue { year, value })
                .collect(),
        })
        .collect();

    Ok(SubFieldSeries {
        sub_field_name: sub_field_name.to_string(),
        sub_field_id: first.sub_field_id.clone(),
        data,
    })
}

/// Collect the yearly size entries of a subfield
pub fn sizes_for(
    document: &TopicSizeDocument,
    sub_field_name: &str,
) -> Result<SubFieldSizes, AppError> {
    let data: Vec<YearSize> = document
        .entries_for(sub_field_name)
        .map(|(year, size)| YearSize {
            year: year.clone(),
            sub_fields: vec![SizeMeasurement {
                sub_field_publication_count: size.publication_count.clone(),
                topic_data: size.topic_data.clone(),
            }],
        })
        .collect();

    if data.is_empty() {
        return Err(no_sub_field(sub_field_name));
    }

    Ok(SubFieldSizes {
        sub_field_name: sub_field_name.to_string(),
        data,
    })
}

fn no_sub_field(sub_field_name: &str) -> AppError {
    tracing::debug!(sub_field = %sub_field_name, "Sub-field not found");
    AppError::NotFound(format!("No data found for sub-field '{}'", sub_field_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;

    const COUNTS: &str = "\
sub_field_id,sub_field_name,topic_id,topic_name,2020,2021,2022
3101,Optics,10,Lasers,12,15,
3101,Optics,11,Lenses,,2,4
3102,Acoustics,12,Sonar,1,1,1
";

    fn table() -> YearTable {
        YearTable::from_reader(COUNTS.as_bytes(), Path::new("counts.csv"))
            .expect("Failed to parse table")
    }

    #[test]
    fn test_parse_view() {
        assert_eq!(SubFieldView::parse("count").unwrap(), SubFieldView::Count);
        assert_eq!(SubFieldView::parse("growth").unwrap(), SubFieldView::Growth);
        assert_eq!(SubFieldView::parse("size").unwrap(), SubFieldView::Size);
        match SubFieldView::parse("Count") {
            Err(AppError::UnsupportedType(t)) => assert_eq!(t, "Count"),
            other => panic!("Expected UnsupportedType, got: {:?}", other),
        }
    }

    #[test]
    fn test_series_for_sub_field() {
        let series = series_for(&table(), "Optics").expect("Optics series");
        let json = serde_json::to_value(&series).expect("serialize");
        assert_eq!(
            json,
            json!({
                "subFieldName": "Optics",
                "subFieldId": 3101,
                "data": [
                    {
                        "topicName": "Lasers",
                        "topicId": 10,
                        "values": [ { "year": 2020, "value": 12.0 }, { "year": 2021, "value": 15.0 } ]
                    },
                    {
                        "topicName": "Lenses",
                        "topicId": 11,
                        "values": [ { "year": 2021, "value": 2.0 }, { "year": 2022, "value": 4.0 } ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_series_for_unknown_sub_field() {
        match series_for(&table(), "Geology") {
            Err(AppError::NotFound(msg)) => {
                assert_eq!(msg, "No data found for sub-field 'Geology'")
            }
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_sizes_for_sub_field() {
        let document: TopicSizeDocument = serde_json::from_value(json!({
            "data": [
                { "year": 2024, "subFields": [
                    { "subFieldName": "Optics", "subFieldPublicationCount": 50, "topicData": [ { "topicName": "Lasers", "count": 30 } ] },
                    { "subFieldName": "Acoustics", "subFieldPublicationCount": 5, "topicData": [] }
                ] },
                { "year": 2023, "subFields": [ { "subFieldName": "Optics", "subFieldPublicationCount": 41 } ] }
            ]
        }))
        .expect("Failed to parse sizes");

        let sizes = sizes_for(&document, "Optics").expect("Optics sizes");
        assert_eq!(
            serde_json::to_value(&sizes).expect("serialize"),
            json!({
                "subFieldName": "Optics",
                "data": [
                    { "year": 2024, "subFields": [ { "subFieldPublicationCount": 50, "topicData": [ { "topicName": "Lasers", "count": 30 } ] } ] },
                    { "year": 2023, "subFields": [ { "subFieldPublicationCount": 41, "topicData": [] } ] }
                ]
            })
        );

        assert!(matches!(
            sizes_for(&document, "Geology"),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_type_does_not_touch_store() {
        // Empty data dir: any load would fail with DatasetUnavailable
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = DatasetStore::new(temp_dir.path());

        match get_sub_field_detail(&store, "Optics", "pie").await {
            Err(AppError::UnsupportedType(t)) => assert_eq!(t, "pie"),
            other => panic!("Expected UnsupportedType, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_dataset_is_unavailable() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = DatasetStore::new(temp_dir.path());

        match get_sub_field_detail(&store, "Optics", "growth").await {
            Err(AppError::DatasetUnavailable(msg)) => {
                assert!(msg.starts_with("Failed to load dataset: "), "got: {}", msg)
            }
            other => panic!("Expected DatasetUnavailable, got: {:?}", other),
        }

        match get_sub_field_detail(&store, "Optics", "size").await {
            Err(AppError::DatasetUnavailable(msg)) => {
                assert!(msg.starts_with("Failed to read size JSON: "), "got: {}", msg)
            }
            other => panic!("Expected DatasetUnavailable, got: {:?}", other),
        }
    }
}
