use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::menu_item::MenuItem;

/// Envelope returned by successful single-item operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemResponse {
    pub err: Option<String>,
    pub data: Option<MenuItem>,
}

impl ItemResponse {
    pub fn ok(item: MenuItem) -> Self {
        Self {
            err: None,
            data: Some(item),
        }
    }
}

/// Envelope returned by the list endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemListResponse {
    pub err: Option<String>,
    pub data: Option<Vec<MenuItem>>,
}

impl ItemListResponse {
    pub fn ok(items: Vec<MenuItem>) -> Self {
        Self {
            err: None,
            data: Some(items),
        }
    }
}

/// Envelope returned for every API failure; `data` is always null
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub err: String,
    pub data: Option<JsonValue>,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}
