use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::Error as CoreError;
use crate::rates::RateError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Core(err) = &self;
        let status = match err {
            CoreError::Rate(RateError::NotFound(_)) => StatusCode::NOT_FOUND,
            CoreError::Rate(RateError::InvalidDate(_)) => StatusCode::BAD_REQUEST,
            CoreError::Rate(RateError::Unavailable(_))
            | CoreError::Rate(RateError::ProtocolMismatch(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: err.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
