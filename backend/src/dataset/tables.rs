//! Tabular datasets
//!
//! CSV tables keyed by subfield/topic with one column per year. Empty or
//! non-numeric cells are treated as missing values rather than errors.

use super::error::DatasetError;
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

const SUB_FIELD_NAME: &str = "sub_field_name";
const SUB_FIELD_ID: &str = "sub_field_id";
const TOPIC_NAME: &str = "topic_name";
const TOPIC_ID: &str = "topic_id";

const ALL_AVG_SUFFIX: &str = "_all_avg";
const SUB_FIELD_AVG_SUFFIX: &str = "_sub_field_avg";

/// One topic row of a per-year table
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSeries {
    /// Name of the subfield the topic belongs to
    pub sub_field_name: String,
    /// Subfield identifier as it appears in the file
    pub sub_field_id: Value,
    /// Name of the topic
    pub topic_name: String,
    /// Topic identifier as it appears in the file
    pub topic_id: Value,
    /// Cells in year-column order; `None` for missing values
    pub values: Vec<(i32, Option<f64>)>,
}

impl TopicSeries {
    /// Years with a value, in column order
    pub fn present_values(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .filter_map(|(year, value)| value.map(|v| (*year, v)))
    }

    /// Value for a specific year, if the column exists and is filled in
    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.values
            .iter()
            .find(|(y, _)| *y == year)
            .and_then(|(_, value)| *value)
    }
}

/// Table of topics with one numeric column per year
///
/// Used for both `datasetPublicationCount.csv` and `growthRateOfTopic.csv`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearTable {
    /// Rows in file order
    pub rows: Vec<TopicSeries>,
}

impl YearTable {
    /// Parse a table from CSV bytes
    ///
    /// `path` is only used to label errors.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, DatasetError> {
        let csv_err = |source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv_reader(reader);
        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };

        let sub_field_name = column(SUB_FIELD_NAME)?;
        let sub_field_id = column(SUB_FIELD_ID)?;
        let topic_name = column(TOPIC_NAME)?;
        let topic_id = column(TOPIC_ID)?;

        let year_columns: Vec<(usize, i32)> = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| year_header(header).map(|year| (idx, year)))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            rows.push(TopicSeries {
                sub_field_name: cell(sub_field_name).to_string(),
                sub_field_id: scalar(cell(sub_field_id)),
                topic_name: cell(topic_name).to_string(),
                topic_id: scalar(cell(topic_id)),
                values: year_columns
                    .iter()
                    .map(|(idx, year)| (*year, number(cell(*idx))))
                    .collect(),
            });
        }

        Ok(Self { rows })
    }

    /// All rows belonging to a subfield, in file order
    pub fn rows_for_sub_field<'a>(
        &'a self,
        sub_field_name: &'a str,
    ) -> impl Iterator<Item = &'a TopicSeries> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.sub_field_name == sub_field_name)
    }

    /// First row for a topic
    pub fn find_topic(&self, topic_name: &str) -> Option<&TopicSeries> {
        self.rows.iter().find(|row| row.topic_name == topic_name)
    }
}

/// Per-subfield yearly averages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AverageRow {
    /// Name of the subfield
    pub sub_field_name: String,
    /// Average over all topics, by year
    pub all_avg: BTreeMap<i32, f64>,
    /// Average over the subfield's topics, by year
    pub sub_field_avg: BTreeMap<i32, f64>,
}

/// Table parsed from `avgPublicationCount.csv`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AverageTable {
    /// Rows in file order
    pub rows: Vec<AverageRow>,
}

impl AverageTable {
    /// Parse an averages table from CSV bytes
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, DatasetError> {
        let csv_err = |source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv_reader(reader);
        let headers = reader.headers().map_err(csv_err)?.clone();
        let name_idx = headers
            .iter()
            .position(|h| h == SUB_FIELD_NAME)
            .ok_or_else(|| DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: SUB_FIELD_NAME,
            })?;

        let mut all_columns = Vec::new();
        let mut sub_field_columns = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(year) = header.strip_suffix(ALL_AVG_SUFFIX).and_then(year_header) {
                all_columns.push((idx, year));
            } else if let Some(year) = header
                .strip_suffix(SUB_FIELD_AVG_SUFFIX)
                .and_then(year_header)
            {
                sub_field_columns.push((idx, year));
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let by_year = |columns: &[(usize, i32)]| {
                columns
                    .iter()
                    .filter_map(|(idx, year)| {
                        number(record.get(*idx).unwrap_or("")).map(|v| (*year, v))
                    })
                    .collect::<BTreeMap<_, _>>()
            };

            rows.push(AverageRow {
                sub_field_name: record.get(name_idx).unwrap_or("").to_string(),
                all_avg: by_year(&all_columns),
                sub_field_avg: by_year(&sub_field_columns),
            });
        }

        Ok(Self { rows })
    }

    /// First averages row for a subfield
    pub fn find_sub_field(&self, sub_field_name: &str) -> Option<&AverageRow> {
        self.rows
            .iter()
            .find(|row| row.sub_field_name == sub_field_name)
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    // Short rows are padded with missing values instead of rejected.
    csv::ReaderBuilder::new().flexible(true).from_reader(reader)
}

/// Parse a header made only of ASCII digits as a year
fn year_header(header: &str) -> Option<i32> {
    if header.is_empty() || !header.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    header.parse().ok()
}

fn number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Convert an identifier cell into a JSON scalar
fn scalar(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(float) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(float);
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COUNTS: &str = "\
sub_field_id,sub_field_name,topic_id,topic_name,2019,2020,note,2021
17,Optics,T1,Lasers,10,,x,12.5
17,Optics,T2,Lenses,3,4,y,NaN
22,Acoustics,T3,Sonar,1,2,z
";

    fn counts() -> YearTable {
        YearTable::from_reader(COUNTS.as_bytes(), Path::new("counts.csv"))
            .expect("Failed to parse counts table")
    }

    #[test]
    fn test_year_columns_and_missing_cells() {
        let table = counts();
        assert_eq!(table.rows.len(), 3);

        let lasers = &table.rows[0];
        assert_eq!(lasers.sub_field_id, json!(17));
        assert_eq!(lasers.topic_id, json!("T1"));
        assert_eq!(
            lasers.values,
            vec![(2019, Some(10.0)), (2020, None), (2021, Some(12.5))]
        );
        assert_eq!(
            lasers.present_values().collect::<Vec<_>>(),
            vec![(2019, 10.0), (2021, 12.5)]
        );

        // NaN and short rows both read as missing
        assert_eq!(table.rows[1].value_for(2021), None);
        assert_eq!(table.rows[2].value_for(2021), None);
        assert_eq!(table.rows[2].value_for(2020), Some(2.0));
    }

    #[test]
    fn test_lookup_by_sub_field_and_topic() {
        let table = counts();
        let optics: Vec<_> = table
            .rows_for_sub_field("Optics")
            .map(|row| row.topic_name.as_str())
            .collect();
        assert_eq!(optics, vec!["Lasers", "Lenses"]);
        assert_eq!(table.rows_for_sub_field("optics").count(), 0);

        assert_eq!(
            table.find_topic("Sonar").map(|row| row.sub_field_name.as_str()),
            Some("Acoustics")
        );
        assert!(table.find_topic("Radar").is_none());
    }

    #[test]
    fn test_missing_required_column() {
        let result = YearTable::from_reader(
            "sub_field_name,topic_name,2020\nOptics,Lasers,1\n".as_bytes(),
            Path::new("broken.csv"),
        );
        match result {
            Err(DatasetError::MissingColumn { column, .. }) => assert_eq!(column, SUB_FIELD_ID),
            other => panic!("Expected MissingColumn error, got: {:?}", other),
        }
    }

    #[test]
    fn test_average_table() {
        let csv = "\
sub_field_name,2020_all_avg,2020_sub_field_avg,2021_all_avg,2021_sub_field_avg,total
Optics,5.5,7,6,,99
Acoustics,1,2,3,4,10
";
        let table = AverageTable::from_reader(csv.as_bytes(), Path::new("avg.csv"))
            .expect("Failed to parse averages");

        let optics = table.find_sub_field("Optics").expect("Optics row");
        assert_eq!(optics.all_avg.get(&2020), Some(&5.5));
        assert_eq!(optics.all_avg.get(&2021), Some(&6.0));
        assert_eq!(optics.sub_field_avg.get(&2020), Some(&7.0));
        assert_eq!(optics.sub_field_avg.get(&2021), None);
        assert!(table.find_sub_field("Geology").is_none());
    }

    #[test]
    fn test_scalar_ids() {
        assert_eq!(scalar("42"), json!(42));
        assert_eq!(scalar("4.5"), json!(4.5));
        assert_eq!(scalar("https://openalex.org/T1"), json!("https://openalex.org/T1"));
        assert_eq!(scalar(""), Value::Null);
    }
}
