pub mod config;
pub mod store;
pub mod types;
pub mod users;

use std::sync::Arc;
use store::ItemStore;

/// Shared application state, built once per cold start.
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub table_name: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, table_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            store,
            table_name: table_name.into(),
        })
    }
}
