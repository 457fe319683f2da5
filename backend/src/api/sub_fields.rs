//! Sub-field detail API handler

use super::utils::{query_pairs, required, DetailParams, QueryPairs};
use crate::error::AppError;
use crate::services::sub_field_detail::{get_sub_field_detail, SubFieldDetail};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use std::sync::Arc;

/// GET /sub-field-detail?name=&type= - Topic trends or sizes of a subfield
pub async fn sub_field_detail(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<SubFieldDetail>, AppError> {
    let params = DetailParams::from(&query_pairs(query)?);
    let (Some(name), Some(type_)) = (required(&params.name), required(&params.type_)) else {
        return Err(AppError::MissingParameter(
            "Missing 'name' or 'type' parameter".to_string(),
        ));
    };

    let detail = get_sub_field_detail(&state.store, name, type_).await?;
    Ok(Json(detail))
}
