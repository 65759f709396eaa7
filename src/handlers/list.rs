use crate::error::ApiError;
use crate::models::{ErrorResponse, ItemListResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /menuitems handler - List every menu item, ordered by id
#[utoipa::path(
    get,
    path = routes::MENU_ITEMS,
    responses(
        (status = 200, description = "All menu items", body = ItemListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "menuitems"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ItemListResponse>), ApiError> {
    let items = state.accessor.get_all_items().await?;

    tracing::info!("Listed {} menu items", items.len());
    Ok((StatusCode::OK, Json(ItemListResponse::ok(items))))
}
