// Route path constants and the application router

use axum::{middleware, routing::get, routing::post, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::id_guard;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const MENU_ITEMS: &str = "/menuitems";
pub const MENU_ITEM: &str = "/menuitems/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Assemble the full application router
pub fn build_router(state: AppState) -> Router {
    let item_routes = Router::new()
        .route(
            MENU_ITEM,
            post(handlers::create_handler)
                .put(handlers::update_handler)
                .delete(handlers::delete_handler)
                .fallback(handlers::method_not_allowed_handler),
        )
        .route_layer(middleware::from_fn(id_guard::require_three_digit_id));

    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(
            MENU_ITEMS,
            get(handlers::list_handler)
                .post(handlers::bulk_handler)
                .put(handlers::bulk_handler)
                .delete(handlers::bulk_handler)
                .fallback(handlers::method_not_allowed_handler),
        )
        .merge(item_routes)
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .fallback(handlers::fallback_handler)
        .with_state(state)
}
