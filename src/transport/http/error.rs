//! Mapping of domain failures onto HTTP responses.

use crate::app::movie_store::StoreError;
use crate::domain::movie::{ValidationErrors, Violation, ViolationCode, BODY_FIELD};
use crate::transport::http::types::{
    MessageResponse, ValidationErrorResponse, CORS_REJECTED_MESSAGE, NOT_FOUND_MESSAGE,
};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("movie not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("origin not allowed")]
    CorsRejected,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Validation(errs) => ApiError::Validation(errs),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Validation(ValidationErrors::single(Violation::new(
            BODY_FIELD,
            ViolationCode::InvalidType,
            format!("Invalid JSON body: {}", err.body_text()),
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new(NOT_FOUND_MESSAGE)),
            )
                .into_response(),
            ApiError::Validation(errs) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: errs.into_violations(),
                }),
            )
                .into_response(),
            ApiError::CorsRejected => (
                StatusCode::FORBIDDEN,
                Json(MessageResponse::new(CORS_REJECTED_MESSAGE)),
            )
                .into_response(),
        }
    }
}
