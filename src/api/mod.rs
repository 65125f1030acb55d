pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::config::ServiceMode;
use crate::ml::ModelRegistry;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub mode: ServiceMode,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, mode: ServiceMode) -> Self {
        Self { registry, mode }
    }
}
