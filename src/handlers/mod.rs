pub mod create;
pub mod delete;
pub mod fallback;
pub mod health;
pub mod list;
pub mod unsupported;
pub mod update;

pub use create::create_handler;
pub use delete::delete_handler;
pub use fallback::fallback_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use unsupported::{bulk_handler, method_not_allowed_handler};
pub use update::update_handler;

use crate::error::ApiError;
use crate::menu_item::{parse_id, MenuItem, RawMenuItem};
use serde::de::Error as _;
use serde_json::Value as JsonValue;

/// Build the menu item a create or update request describes
///
/// The URL id is authoritative. A body id is optional, but when present it
/// must name the same item.
pub(crate) fn item_from_body(id: u32, body: &[u8]) -> Result<MenuItem, ApiError> {
    let value: JsonValue = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(ApiError::JsonError(serde_json::Error::custom(
            "request body must be a JSON object",
        )));
    }
    let mut raw: RawMenuItem = serde_json::from_value(value)?;

    if let Some(body_id) = &raw.id {
        let body_id = parse_id(body_id)?;
        if body_id != id {
            return Err(ApiError::IdMismatch { path: id, body: body_id });
        }
    }

    raw.id = Some(JsonValue::from(id));
    Ok(MenuItem::try_from(raw)?)
}
