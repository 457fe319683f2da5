//! Topic detail service
//!
//! Yearly publication counts of a single topic, and the topic's size set
//! against its subfield average and the all-topic average.

use super::unavailable;
use crate::dataset::{AverageTable, DatasetStore, TopicSeries, YearTable};
use crate::error::AppError;
use serde::Serialize;
use serde_json::Value;

/// First year of the size comparison
pub const SIZE_FIRST_YEAR: i32 = 1970;
/// Last year of the size comparison
pub const SIZE_LAST_YEAR: i32 = 2024;

/// Which topic view is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicView {
    /// Trend line of yearly publication counts
    Count,
    /// Size compared with subfield and global averages
    Size,
}

impl TopicView {
    /// Parse the `type` query parameter
    pub fn parse(type_: &str) -> Result<Self, AppError> {
        match type_ {
            "count" => Ok(TopicView::Count),
            "size" => Ok(TopicView::Size),
            other => Err(AppError::UnsupportedType(other.to_string())),
        }
    }
}

/// Publication count for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    /// Calendar year
    pub year: i32,
    /// Publications that year
    pub value: i64,
}

/// Topic size and the averages it is compared against
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearComparison {
    /// Calendar year
    pub year: i32,
    /// Topic publications that year
    pub value: i64,
    /// Average over every topic
    pub all_topic_avg: f64,
    /// Average over the topic's subfield
    pub sub_field_avg: f64,
}

/// Response for `type=count`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCounts {
    /// Subfield the topic belongs to
    pub sub_field_name: String,
    /// Subfield identifier
    pub sub_field_id: Value,
    /// Topic name
    pub topic_name: String,
    /// Topic identifier
    pub topic_id: Value,
    /// Filled-in years, in column order
    pub publication_count: Vec<YearCount>,
}

/// Response for `type=size`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSizes {
    /// Subfield the topic belongs to
    pub sub_field_name: String,
    /// Subfield identifier
    pub sub_field_id: Value,
    /// Topic name
    pub topic_name: String,
    /// Topic identifier
    pub topic_id: Value,
    /// Years where the topic value and both averages are known
    pub average_and_size_count: Vec<YearComparison>,
}

/// Any topic detail response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TopicDetail {
    /// Publication count trend
    Counts(TopicCounts),
    /// Size comparison
    Sizes(TopicSizes),
}

/// Answer a topic detail request
///
/// The topic is resolved before `type` is checked, so an unknown topic is
/// reported even when the type is also wrong.
pub async fn get_topic_detail(
    store: &DatasetStore,
    name: &str,
    type_: &str,
) -> Result<TopicDetail, AppError> {
    let counts = store
        .publication_counts()
        .await
        .map_err(unavailable("Failed to load count dataset"))?;
    let topic = find_topic(&counts, name)?;

    match TopicView::parse(type_)? {
        TopicView::Count => Ok(TopicDetail::Counts(publication_counts(topic))),
        TopicView::Size => {
            let averages = store
                .publication_averages()
                .await
                .map_err(unavailable("Failed to load average dataset"))?;
            size_comparison(topic, &averages).map(TopicDetail::Sizes)
        }
    }
}

/// First row of the table for a topic
pub fn find_topic<'a>(table: &'a YearTable, topic_name: &str) -> Result<&'a TopicSeries, AppError> {
    table.find_topic(topic_name).ok_or_else(|| {
        tracing::debug!(topic = %topic_name, "Topic not found");
        AppError::NotFound(format!("No data found for topic '{}'", topic_name))
    })
}

/// Build the count trend of a topic
pub fn publication_counts(topic: &TopicSeries) -> TopicCounts {
    TopicCounts {
        sub_field_name: topic.sub_field_name.clone(),
        sub_field_id: topic.sub_field_id.clone(),
        topic_name: topic.topic_name.clone(),
        topic_id: topic.topic_id.clone(),
        publication_count: topic
            .present_values()
            .map(|(year, value)| YearCount {
                year,
                value: value as i64,
            })
            .collect(),
    }
}

/// Build the size comparison of a topic against its subfield's averages
pub fn size_comparison(
    topic: &TopicSeries,
    averages: &AverageTable,
) -> Result<TopicSizes, AppError> {
    let row = averages
        .find_sub_field(&topic.sub_field_name)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No averages found for sub-field '{}'",
                topic.sub_field_name
            ))
        })?;

    let average_and_size_count = (SIZE_FIRST_YEAR..=SIZE_LAST_YEAR)
        .filter_map(|year| {
            let value = topic.value_for(year)?;
            let all_topic_avg = *row.all_avg.get(&year)?;
            let sub_field_avg = *row.sub_field_avg.get(&year)?;
            Some(YearComparison {
                year,
                value: value as i64,
                all_topic_avg,
                sub_field_avg,
            })
        })
        .collect();

    Ok(TopicSizes {
        sub_field_name: topic.sub_field_name.clone(),
        sub_field_id: topic.sub_field_id.clone(),
        topic_name: topic.topic_name.clone(),
        topic_id: topic.topic_id.clone(),
        average_and_size_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn counts() -> YearTable {
        let csv = "\
sub_field_id,sub_field_name,topic_id,topic_name,1969,2019,2020,2021,2025
7,Optics,70,Lasers,1,8,9.8,,4
7,Optics,71,Lasers,100,100,100,100,100
8,Acoustics,80,Sonar,1,2,3,4,5
";
        YearTable::from_reader(csv.as_bytes(), Path::new("counts.csv")).expect("counts")
    }

    fn averages() -> AverageTable {
        let csv = "\
sub_field_name,2019_all_avg,2019_sub_field_avg,2020_all_avg,2020_sub_field_avg,2021_all_avg,2021_sub_field_avg,2025_all_avg,2025_sub_field_avg
Optics,2.5,3.5,,4,1,1,9,9
";
        AverageTable::from_reader(csv.as_bytes(), Path::new("avg.csv")).expect("averages")
    }

    #[test]
    fn test_counts_use_first_matching_row_and_truncate() {
        let table = counts();
        let topic = find_topic(&table, "Lasers").expect("Lasers");
        let response = publication_counts(topic);

        assert_eq!(
            serde_json::to_value(&response).expect("serialize"),
            json!({
                "subFieldName": "Optics",
                "subFieldId": 7,
                "topicName": "Lasers",
                "topicId": 70,
                "publicationCount": [
                    { "year": 1969, "value": 1 },
                    { "year": 2019, "value": 8 },
                    { "year": 2020, "value": 9 },
                    { "year": 2025, "value": 4 }
                ]
            })
        );
    }

    #[test]
    fn test_size_comparison_requires_all_three_values() {
        let table = counts();
        let topic = find_topic(&table, "Lasers").expect("Lasers");
        let response = size_comparison(topic, &averages()).expect("comparison");

        // 1969 and 2025 fall outside the range, 2020 lacks an all-topic
        // average, 2021 lacks a topic value.
        assert_eq!(
            response.average_and_size_count,
            vec![YearComparison {
                year: 2019,
                value: 8,
                all_topic_avg: 2.5,
                sub_field_avg: 3.5,
            }]
        );
    }

    #[test]
    fn test_size_comparison_missing_averages() {
        let table = counts();
        let topic = find_topic(&table, "Sonar").expect("Sonar");
        match size_comparison(topic, &averages()) {
            Err(AppError::NotFound(msg)) => {
                assert_eq!(msg, "No averages found for sub-field 'Acoustics'")
            }
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_topic() {
        let table = counts();
        match find_topic(&table, "Radar") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "No data found for topic 'Radar'"),
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_view() {
        assert_eq!(TopicView::parse("count").unwrap(), TopicView::Count);
        assert_eq!(TopicView::parse("size").unwrap(), TopicView::Size);
        assert!(matches!(
            TopicView::parse("growth"),
            Err(AppError::UnsupportedType(_))
        ));
    }
}
