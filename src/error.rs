use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::menu_item::ValidationError;
use crate::models::ErrorResponse;

/// Message returned in place of any internal failure detail
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Custom error type for API endpoints
///
/// Every variant renders as an `{err, data: null}` envelope with the status
/// code matching the failure kind: client input (400), resource state
/// (404/409), unsupported method (405) or internal (500).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Menu item fields failed validation
    #[error("Invalid menu item: {0}")]
    InvalidItem(#[from] ValidationError),
    /// Body id disagrees with the id in the URL
    #[error("Id mismatch: body id {body} does not match URL id {path}")]
    IdMismatch { path: u32, body: u32 },
    /// Request body is not a JSON object
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// No stored item has this id
    #[error("Menu item not found: {0}")]
    ItemNotFound(u32),
    /// Nothing is routed at this path
    #[error("Not found: {0}")]
    RouteNotFound(String),
    /// An item with this id already exists
    #[error("Menu item already exists: {0}")]
    DuplicateItem(u32),
    #[error("{0}")]
    MethodNotAllowed(String),
    /// Accessor failure; details are logged, never returned
    #[error("Database error: {0:#}")]
    DatabaseError(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidItem(_) | ApiError::IdMismatch { .. } | ApiError::JsonError(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ItemNotFound(_) | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateItem(_) => StatusCode::CONFLICT,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let err = match &self {
            ApiError::DatabaseError(_) => {
                tracing::error!("{}", self);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse { err, data: None });

        (status, body).into_response()
    }
}
