use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Catch-all for requests no route matched
///
/// Paths under `/menuitems` get a JSON not-found envelope. Everything else is
/// looked up in the public directory; misses (and non-GET methods) are
/// answered with the 404 page and a 404 status.
pub async fn fallback_handler(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path();
    if is_api_path(path) {
        tracing::info!("No API route for {} {}", request.method(), path);
        return ApiError::RouteNotFound(path.to_string()).into_response();
    }

    let static_files = ServeDir::new(&state.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(ServeFile::new(state.config.page_404()));

    match static_files.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

fn is_api_path(path: &str) -> bool {
    path.strip_prefix(routes::MENU_ITEMS)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
