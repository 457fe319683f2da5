//! API utility functions
//!
//! Helpers shared by the query handlers for reading query-string parameters.

use crate::error::AppError;
use axum::extract::{rejection::QueryRejection, Query};
use serde::Deserialize;

/// Every `key=value` pair of a query string, in request order
///
/// A repeated key is not an error; lookups take its first value.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// First value supplied for `key`
    pub fn first(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryPairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryPairs(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Unwrap the query extractor, reporting a malformed query string as JSON
pub fn query_pairs(
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<QueryPairs, AppError> {
    match query {
        Ok(Query(pairs)) => Ok(pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected query string");
            Err(AppError::InvalidParameter(rejection.body_text()))
        }
    }
}

/// Query string of the detail endpoints
#[derive(Debug, Default)]
pub struct DetailParams {
    /// Subfield or topic name
    pub name: Option<String>,
    /// View to render
    pub type_: Option<String>,
}

impl From<&QueryPairs> for DetailParams {
    fn from(pairs: &QueryPairs) -> Self {
        DetailParams {
            name: pairs.first("name"),
            type_: pairs.first("type"),
        }
    }
}

/// A parameter that must be present and non-empty
///
/// # Arguments
/// * `value` - Raw query-string value
///
/// # Returns
/// * `Some(&str)` - Parameter was supplied with a value
/// * `None` - Parameter is absent or empty
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
