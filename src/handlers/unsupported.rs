use crate::error::ApiError;
use axum::http::{Method, Uri};

/// POST/PUT/DELETE /menuitems handler - Bulk writes are never supported
///
/// Always answers 405, whatever the body holds.
pub async fn bulk_handler(method: Method) -> ApiError {
    let operation = match method {
        Method::POST => "create",
        Method::PUT => "update",
        Method::DELETE => "delete",
        _ => "modification",
    };

    tracing::info!("Rejected bulk {} on menu items", operation);
    ApiError::MethodNotAllowed(format!(
        "Bulk {} is not supported; use /menuitems/{{id}} to {} a single item",
        operation, operation
    ))
}

/// Method fallback for menu item routes, including single-item GET
pub async fn method_not_allowed_handler(method: Method, uri: Uri) -> ApiError {
    tracing::info!("Rejected {} {}", method, uri.path());
    ApiError::MethodNotAllowed(format!(
        "Method {} is not allowed on {}",
        method,
        uri.path()
    ))
}
