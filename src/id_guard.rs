use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Route-level id policy: menu item URLs carry exactly three ASCII digits
///
/// Runs before any body handling. Requests that fail the check get the same
/// not-found answer as an unmatched route, never a 400. This is a URL rule
/// only; stored items may use any positive id.
pub async fn require_three_digit_id(
    Path(id): Path<String>,
    request: Request,
    next: Next,
) -> Response {
    if is_three_digit_id(&id) {
        return next.run(request).await;
    }

    tracing::debug!("Rejected malformed menu item id: {:?}", id);
    ApiError::RouteNotFound(request.uri().path().to_string()).into_response()
}

pub fn is_three_digit_id(id: &str) -> bool {
    id.len() == 3 && id.bytes().all(|b| b.is_ascii_digit())
}
