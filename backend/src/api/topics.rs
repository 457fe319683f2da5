//! Topic detail API handler

use super::utils::{query_pairs, required, DetailParams, QueryPairs};
use crate::error::AppError;
use crate::services::topic_detail::{get_topic_detail, TopicDetail};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use std::sync::Arc;

/// GET /topic-detail?name=&type= - Publication counts or size comparison of a topic
pub async fn topic_detail(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<TopicDetail>, AppError> {
    let params = DetailParams::from(&query_pairs(query)?);
    let (Some(name), Some(type_)) = (required(&params.name), required(&params.type_)) else {
        return Err(AppError::MissingParameter(
            "Missing 'name' or 'type' parameter".to_string(),
        ));
    };

    let detail = get_topic_detail(&state.store, name, type_).await?;
    Ok(Json(detail))
}
