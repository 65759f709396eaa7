use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::accessor::MenuItemAccessor;
use crate::menu_item::MenuItem;

/// Process-local accessor keeping items in an ordered map
///
/// Contents are lost on restart. Used as the default backend and in tests.
#[derive(Debug, Default)]
pub struct InMemoryAccessor {
    items: RwLock<BTreeMap<u32, MenuItem>>,
}

impl InMemoryAccessor {
    pub fn new() -> Self {
        Self::with_items(std::iter::empty())
    }

    /// Create an accessor pre-populated with `items`; later duplicates win
    pub fn with_items(items: impl IntoIterator<Item = MenuItem>) -> Self {
        let items = items.into_iter().map(|item| (item.id(), item)).collect();
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl MenuItemAccessor for InMemoryAccessor {
    async fn get_all_items(&self) -> Result<Vec<MenuItem>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get_item_by_id(&self, id: u32) -> Result<Option<MenuItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn item_exists(&self, item: &MenuItem) -> Result<bool> {
        Ok(self.items.read().await.contains_key(&item.id()))
    }

    async fn add_item(&self, item: &MenuItem) -> Result<bool> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id()) {
            return Ok(false);
        }
        items.insert(item.id(), item.clone());
        tracing::debug!("Added menu item {} to memory store", item.id());
        Ok(true)
    }

    async fn update_item(&self, item: &MenuItem) -> Result<bool> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id()) {
            Some(existing) => {
                *existing = item.clone();
                tracing::debug!("Updated menu item {} in memory store", item.id());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, item: &MenuItem) -> Result<bool> {
        let removed = self.items.write().await.remove(&item.id()).is_some();
        if removed {
            tracing::debug!("Deleted menu item {} from memory store", item.id());
        }
        Ok(removed)
    }
}
