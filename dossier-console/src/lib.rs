pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use dossier_core::ApiClient;
use std::sync::Arc;

/// Shared application state: the backend client every handler goes through.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiClient>,
}

impl AppState {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}
