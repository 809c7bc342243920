pub mod api_error;
pub mod rates;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::rates::RateServiceTrait;

pub use api_error::{ApiError, ApiResult};

pub struct AppState {
    pub rate_service: Arc<dyn RateServiceTrait>,
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/rates", get(rates::get_all_rates))
        .route("/rates/{currency}", get(rates::get_rate_by_currency))
        .with_state(state)
}
