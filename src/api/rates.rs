use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiResult, AppState};
use crate::rates::{AggregationOption, RateView};

#[derive(Deserialize)]
pub struct RateQuery {
    date: Option<String>,
    /// One of `last`, `avg`, `min`, `max`; unknown spellings are rejected
    /// with 400 by the deserializer instead of falling back to a default.
    option: Option<AggregationOption>,
}

pub async fn get_rate_by_currency(
    State(state): State<Arc<AppState>>,
    Path(currency): Path<String>,
    Query(query): Query<RateQuery>,
) -> ApiResult<Json<RateView>> {
    let view = state
        .rate_service
        .get_rate(
            &currency,
            query.date.as_deref(),
            query.option.unwrap_or_default(),
        )
        .await?;
    Ok(Json(view))
}

pub async fn get_all_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RateQuery>,
) -> ApiResult<Json<Vec<RateView>>> {
    let views = state
        .rate_service
        .get_all_rates(query.date.as_deref(), query.option.unwrap_or_default())
        .await?;
    Ok(Json(views))
}
