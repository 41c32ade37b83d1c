// src/state.rs
use std::sync::Arc;

use crate::repository::ProductRepository;

/// Shared handler state. The repository is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}
