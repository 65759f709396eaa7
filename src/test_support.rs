// Shared fixtures for router-level tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use crate::accessor::MenuItemAccessor;
use crate::config::{Config, StorageBackend};
use crate::memory::InMemoryAccessor;
use crate::menu_item::{Category, MenuItem};
use crate::routes;
use crate::state::AppState;

pub fn test_config() -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        service_port: 8000,
        service_host: "127.0.0.1".to_string(),
        public_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
    }
}

pub fn app_with(accessor: Arc<dyn MenuItemAccessor>) -> Router {
    routes::build_router(AppState {
        accessor,
        config: Arc::new(test_config()),
    })
}

/// Router over an empty in-memory store
pub fn memory_app() -> Router {
    app_with(Arc::new(InMemoryAccessor::new()))
}

/// Accessor whose every call fails with a message that must not reach clients
pub struct FailingAccessor;

pub const FAILURE_DETAIL: &str = "connection refused: spanner://10.0.0.7:9010";

#[async_trait]
impl MenuItemAccessor for FailingAccessor {
    async fn get_all_items(&self) -> Result<Vec<MenuItem>> {
        Err(anyhow!(FAILURE_DETAIL))
    }

    async fn get_item_by_id(&self, _id: u32) -> Result<Option<MenuItem>> {
        Err(anyhow!(FAILURE_DETAIL))
    }

    async fn add_item(&self, _item: &MenuItem) -> Result<bool> {
        Err(anyhow!(FAILURE_DETAIL))
    }

    async fn update_item(&self, _item: &MenuItem) -> Result<bool> {
        Err(anyhow!(FAILURE_DETAIL))
    }

    async fn delete_item(&self, _item: &MenuItem) -> Result<bool> {
        Err(anyhow!(FAILURE_DETAIL))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow!(FAILURE_DETAIL))
    }
}

/// Accessor whose mutating calls all come back `Ok(false)`
///
/// With `reports_present` set, lookups claim the item is stored, so the
/// handlers get past their existence checks and reach the refused write.
pub struct RefusingAccessor {
    pub reports_present: bool,
}

#[async_trait]
impl MenuItemAccessor for RefusingAccessor {
    async fn get_all_items(&self) -> Result<Vec<MenuItem>> {
        Ok(Vec::new())
    }

    async fn get_item_by_id(&self, id: u32) -> Result<Option<MenuItem>> {
        if !self.reports_present {
            return Ok(None);
        }
        Ok(Some(MenuItem::new(id, Category::Appetizer, "Soup", 4.5, true)?))
    }

    async fn item_exists(&self, _item: &MenuItem) -> Result<bool> {
        Ok(self.reports_present)
    }

    async fn add_item(&self, _item: &MenuItem) -> Result<bool> {
        Ok(false)
    }

    async fn update_item(&self, _item: &MenuItem) -> Result<bool> {
        Ok(false)
    }

    async fn delete_item(&self, _item: &MenuItem) -> Result<bool> {
        Ok(false)
    }
}

pub fn soup_body() -> JsonValue {
    serde_json::json!({
        "category": "APP",
        "description": "Soup",
        "price": 4.5,
        "vegetarian": true
    })
}

/// Send a request and return the status with the raw response body
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&JsonValue>,
) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_string(json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Send a request and parse the response body as JSON
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&JsonValue>,
) -> (StatusCode, JsonValue) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("{} {} returned non-JSON body ({}): {:?}", method, uri, e, bytes));
    (status, json)
}
