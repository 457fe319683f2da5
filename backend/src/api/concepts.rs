//! Concept API handler
//!
//! One endpoint serves the heatmap, word cloud and timeline views; `type`
//! picks the view.

use super::utils::{query_pairs, required, QueryPairs};
use crate::error::AppError;
use crate::services::concepts::{
    get_heatmap, get_timeline, get_word_cloud, ConceptResponse, ConceptView,
};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use std::sync::Arc;

/// Query string of `/concepts`
#[derive(Debug, Default)]
pub struct ConceptParams {
    /// Topic name
    pub name: Option<String>,
    /// `heatMap`, `wordCloud` or `timeLine`
    pub type_: Option<String>,
    /// Concept level
    pub level: Option<String>,
    /// Year, required by the word cloud and timeline
    pub year: Option<String>,
    /// Signed top-N
    pub top: Option<String>,
}

impl From<&QueryPairs> for ConceptParams {
    fn from(pairs: &QueryPairs) -> Self {
        ConceptParams {
            name: pairs.first("name"),
            type_: pairs.first("type"),
            level: pairs.first("level"),
            year: pairs.first("year"),
            top: pairs.first("top"),
        }
    }
}

/// GET /concepts?name=&type=&level=&year=&top= - Concept views of a topic
pub async fn concepts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<ConceptResponse>, AppError> {
    let params = ConceptParams::from(&query_pairs(query)?);
    let (Some(name), Some(type_), Some(level)) = (
        required(&params.name),
        required(&params.type_),
        required(&params.level),
    ) else {
        return Err(AppError::MissingParameter(
            "Missing one or more required parameters: 'name', 'type', 'level'".to_string(),
        ));
    };

    let year = required(&params.year);
    let top = params.top.as_deref();
    let store = &state.store;

    let response = match ConceptView::parse(type_)? {
        ConceptView::HeatMap => {
            ConceptResponse::Heatmap(get_heatmap(store, name, level, top).await?)
        }
        ConceptView::WordCloud => {
            let year = require_year(type_, year)?;
            ConceptResponse::WordCloud(get_word_cloud(store, name, level, year, top).await?)
        }
        ConceptView::TimeLine => {
            let year = require_year(type_, year)?;
            ConceptResponse::Timeline(get_timeline(store, name, level, year, top).await?)
        }
    };

    Ok(Json(response))
}

fn require_year<'a>(type_: &str, year: Option<&'a str>) -> Result<&'a str, AppError> {
    year.ok_or_else(|| {
        AppError::MissingParameter(format!("'year' is required for type '{}'", type_))
    })
}
