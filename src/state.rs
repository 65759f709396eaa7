use crate::accessor::MenuItemAccessor;
use crate::config::Config;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accessor: Arc<dyn MenuItemAccessor>,
    pub config: Arc<Config>,
}
