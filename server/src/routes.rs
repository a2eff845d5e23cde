//! Route handlers for the todo API.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use todo_core::{CreateTodo, Todo, TodoStore, UpdateTodo};

use crate::response::{ApiError, ApiResponse};

pub type AppState = Arc<TodoStore>;

/// JSON request body that tolerates a missing body and content type.
///
/// An empty body reads as `{}`. Anything that is not a JSON object is
/// rejected with `ApiError::BadRequest`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
                _ => ApiError::BadRequest,
            })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(Value::Object(Default::default()))
                .map(JsonBody)
                .map_err(|_| ApiError::BadRequest);
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value)
                .map(JsonBody)
                .map_err(|_| ApiError::BadRequest),
            _ => Err(ApiError::BadRequest),
        }
    }
}

/// The `{id}` path segment.
///
/// A segment that cannot be decoded (invalid percent-encoding or UTF-8)
/// cannot name a stored record, so it answers `ApiError::NotFound`.
pub struct TodoId(pub String);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<String>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| TodoId(id))
            .map_err(|_| ApiError::NotFound)
    }
}

pub async fn list_todos(State(store): State<AppState>) -> Json<ApiResponse<Vec<Todo>>> {
    let list = store.list().await;
    Json(ApiResponse::data(list.data).with_count(list.count))
}

pub async fn create_todo(
    State(store): State<AppState>,
    JsonBody(input): JsonBody<CreateTodo>,
) -> Result<(StatusCode, Json<ApiResponse<Todo>>), ApiError> {
    let todo = store
        .create(input)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create todo"))?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(todo).with_message("Todo created successfully")),
    ))
}

pub async fn update_todo(
    State(store): State<AppState>,
    TodoId(id): TodoId,
    JsonBody(input): JsonBody<UpdateTodo>,
) -> Result<Json<ApiResponse<Todo>>, ApiError> {
    let todo = store
        .update(&id, input)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update todo"))?;
    Ok(Json(
        ApiResponse::data(todo).with_message("Todo updated successfully"),
    ))
}

pub async fn delete_todo(
    State(store): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<ApiResponse<Todo>>, ApiError> {
    let todo = store
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete todo"))?;
    Ok(Json(
        ApiResponse::data(todo).with_message("Todo deleted successfully"),
    ))
}

pub async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: Some("API is running".to_string()),
        timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        ..ApiResponse::default()
    })
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
