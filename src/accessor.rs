use anyhow::Result;
use async_trait::async_trait;

use crate::menu_item::MenuItem;

/// Persistence backend for menu items
///
/// Handlers only ever talk to storage through this trait, so any backend
/// (in-memory, Spanner, ...) can be plugged into [`crate::state::AppState`].
/// Implementations own their data and must serialize their own writes.
///
/// Mutating methods return `Ok(false)` when the item's presence does not
/// allow the operation (adding a duplicate, updating or deleting a missing
/// item). `Err` is reserved for backend failures.
#[async_trait]
pub trait MenuItemAccessor: Send + Sync {
    /// All items, ordered by id
    async fn get_all_items(&self) -> Result<Vec<MenuItem>>;

    async fn get_item_by_id(&self, id: u32) -> Result<Option<MenuItem>>;

    /// Whether an item with the same id is stored
    async fn item_exists(&self, item: &MenuItem) -> Result<bool> {
        Ok(self.get_item_by_id(item.id()).await?.is_some())
    }

    async fn add_item(&self, item: &MenuItem) -> Result<bool>;

    async fn update_item(&self, item: &MenuItem) -> Result<bool>;

    async fn delete_item(&self, item: &MenuItem) -> Result<bool>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
