//! Topic size document
//!
//! Mirrors `topicSizeAndComparison.json`. Values the service only passes
//! through (years, publication counts, topic breakdowns) stay as raw JSON.

use serde::Deserialize;
use serde_json::Value;

/// Root of the topic size document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicSizeDocument {
    /// One entry per year
    #[serde(default)]
    pub data: Vec<YearSizes>,
}

/// Subfield sizes for a single year
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearSizes {
    /// Year as written in the file
    #[serde(default)]
    pub year: Value,
    /// Subfields measured that year
    #[serde(default, rename = "subFields")]
    pub sub_fields: Vec<SubFieldSize>,
}

/// Size of one subfield in one year
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubFieldSize {
    /// Name of the subfield; entries whose name is not a string match nothing
    #[serde(default, rename = "subFieldName")]
    pub sub_field_name: Value,
    /// Total publications in the subfield
    #[serde(default, rename = "subFieldPublicationCount")]
    pub publication_count: Value,
    /// Per-topic breakdown; an empty list when the key is absent
    #[serde(default = "no_topic_data", rename = "topicData")]
    pub topic_data: Value,
}

fn no_topic_data() -> Value {
    Value::Array(Vec::new())
}

impl TopicSizeDocument {
    /// Every `(year, subfield)` pair for the named subfield, in document order
    pub fn entries_for<'a>(
        &'a self,
        sub_field_name: &'a str,
    ) -> impl Iterator<Item = (&'a Value, &'a SubFieldSize)> + 'a {
        self.data.iter().flat_map(move |year| {
            year.sub_fields
                .iter()
                .filter(move |sf| sf.sub_field_name.as_str() == Some(sub_field_name))
                .map(move |sf| (&year.year, sf))
        })
    }
}
