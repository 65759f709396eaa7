use crate::error::ApiError;
use crate::handlers::item_from_body;
use crate::menu_item::MenuItem;
use crate::models::{ErrorResponse, ItemResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// PUT /menuitems/{id} handler - Replace an existing menu item
#[utoipa::path(
    put,
    path = routes::MENU_ITEM,
    params(
        ("id" = String, Path, description = "Three-digit menu item id, e.g. 042")
    ),
    request_body = MenuItem,
    responses(
        (status = 200, description = "Menu item updated", body = ItemResponse),
        (status = 400, description = "Invalid fields, invalid JSON or id mismatch", body = ErrorResponse),
        (status = 404, description = "Menu item not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "menuitems"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    body: Bytes,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let item = item_from_body(id, &body)?;

    if !state.accessor.item_exists(&item).await? {
        tracing::info!("Menu item not found for update: {}", id);
        return Err(ApiError::ItemNotFound(id));
    }

    if !state.accessor.update_item(&item).await? {
        tracing::info!("Menu item disappeared before update: {}", id);
        return Err(ApiError::ItemNotFound(id));
    }

    tracing::info!("Updated menu item with id: {}", id);
    Ok((StatusCode::OK, Json(ItemResponse::ok(item))))
}
