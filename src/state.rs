//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::route_repository::RouteStore;
use crate::services::directions_service::DirectionsProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn RouteStore>,
    pub directions: Arc<dyn DirectionsProvider>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn RouteStore>,
        directions: Arc<dyn DirectionsProvider>,
    ) -> Self {
        Self {
            config,
            store,
            directions,
        }
    }
}
