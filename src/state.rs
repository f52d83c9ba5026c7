//! Shared application state for all routes.

use crate::store::TableStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Read-only after start-up; every handler issues its query through it.
    pub store: Arc<dyn TableStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        AppState { store }
    }
}
