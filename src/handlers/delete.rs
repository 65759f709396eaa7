use crate::error::ApiError;
use crate::models::{ErrorResponse, ItemResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// DELETE /menuitems/{id} handler - Remove a menu item and return it
#[utoipa::path(
    delete,
    path = routes::MENU_ITEM,
    params(
        ("id" = String, Path, description = "Three-digit menu item id, e.g. 042")
    ),
    responses(
        (status = 200, description = "Menu item deleted", body = ItemResponse),
        (status = 404, description = "Menu item not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "menuitems"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let Some(item) = state.accessor.get_item_by_id(id).await? else {
        tracing::info!("Menu item not found for delete: {}", id);
        return Err(ApiError::ItemNotFound(id));
    };

    if !state.accessor.delete_item(&item).await? {
        tracing::info!("Storage did not delete menu item: {}", id);
        return Err(ApiError::ItemNotFound(id));
    }

    tracing::info!("Deleted menu item with id: {}", id);
    Ok((StatusCode::OK, Json(ItemResponse::ok(item))))
}
