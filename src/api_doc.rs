use utoipa::OpenApi;

use crate::handlers;
use crate::menu_item::{Category, MenuItem};
use crate::models::{
    ErrorResponse, HealthResponse, ItemListResponse, ItemResponse, UnhealthyResponse,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-spanner-menu API",
        version = "1.0.0",
        description = "Menu item management for a restaurant admin UI. Every menu item response uses the {err, data} envelope."
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            MenuItem,
            Category,
            ItemResponse,
            ItemListResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "menuitems", description = "Menu item operations")
    )
)]
pub struct ApiDoc;
