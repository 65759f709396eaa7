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

/// POST /menuitems/{id} handler - Create a menu item
///
/// The body carries the item's fields; its `id` may be omitted but must
/// match the URL when given. Ids already in use are rejected with 409.
#[utoipa::path(
    post,
    path = routes::MENU_ITEM,
    params(
        ("id" = String, Path, description = "Three-digit menu item id, e.g. 042")
    ),
    request_body = MenuItem,
    responses(
        (status = 201, description = "Menu item created", body = ItemResponse),
        (status = 400, description = "Invalid fields, invalid JSON or id mismatch", body = ErrorResponse),
        (status = 404, description = "Id is not three digits", body = ErrorResponse),
        (status = 409, description = "Menu item already exists", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "menuitems"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    body: Bytes,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let item = item_from_body(id, &body)?;

    if state.accessor.item_exists(&item).await? {
        tracing::info!("Refused to create duplicate menu item: {}", id);
        return Err(ApiError::DuplicateItem(id));
    }

    if !state.accessor.add_item(&item).await? {
        tracing::info!("Storage refused to add menu item: {}", id);
        return Err(ApiError::DuplicateItem(id));
    }

    tracing::info!("Created menu item with id: {}", id);
    Ok((StatusCode::CREATED, Json(ItemResponse::ok(item))))
}
