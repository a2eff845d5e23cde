//! JSON response envelope and error mapping.
//!
//! # Design
//! Every body is an `ApiResponse` with a `success` flag; fields that do not
//! apply are left out of the JSON entirely. `ApiError` is the single error
//! type handlers return, and its `IntoResponse` impl owns the mapping from
//! failure kind to status code. Internal errors carry only the generic,
//! per-operation message that is safe to show a client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use todo_core::StoreError;

#[derive(Debug, Serialize, Default)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
            error: None,
            details: None,
            timestamp: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Errors returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("todo not found")]
    NotFound,

    #[error("route not found")]
    RouteNotFound,

    /// The request body is not a JSON object.
    #[error("invalid request body")]
    BadRequest,

    /// The request body exceeds the size limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// Storage or other server-side failure. Holds the client-facing message.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a store error, using `context` as the message for storage
    /// failures.
    pub fn from_store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::Validation(details) => ApiError::Validation(details),
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Storage(e) => {
                tracing::error!(error = %e, "{context}");
                ApiError::Internal(context)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(details) => ApiResponse {
                details: Some(details),
                ..ApiResponse::failure("Validation failed")
            },
            ApiError::NotFound => ApiResponse::failure("Todo not found"),
            ApiError::RouteNotFound => ApiResponse::failure("Route not found"),
            ApiError::BadRequest => ApiResponse::failure("Invalid JSON body"),
            ApiError::PayloadTooLarge => ApiResponse::failure("Request body too large"),
            ApiError::Internal(message) => ApiResponse::failure(message),
        };
        (status, Json(body)).into_response()
    }
}
