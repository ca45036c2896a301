use std::sync::Arc;

use crate::dto::api_response::ApiResponse;
use crate::models::driver::Driver;
use crate::models::vehicle::Vehicle;
use crate::services::notifications::NotificationBuffer;
use crate::services::route_service::RouteService;
use crate::state::AppState;

/// Datos de referencia de conductores y vehículos
pub struct FleetController {
    service: RouteService,
    notifications: Arc<NotificationBuffer>,
}

impl FleetController {
    pub fn new(state: &AppState) -> Self {
        let notifications = Arc::new(NotificationBuffer::new());
        Self {
            service: RouteService::new(state.store.clone(), notifications.clone()),
            notifications,
        }
    }

    fn respond<T>(&self, data: Vec<T>) -> ApiResponse<Vec<T>> {
        match self.notifications.last_error() {
            Some(message) => ApiResponse::error_with_data(data, message),
            None => ApiResponse::success(data),
        }
    }

    pub async fn list_drivers(&self) -> ApiResponse<Vec<Driver>> {
        let drivers = self.service.fetch_drivers().await;
        self.respond(drivers)
    }

    pub async fn list_vehicles(&self) -> ApiResponse<Vec<Vehicle>> {
        let vehicles = self.service.fetch_vehicles().await;
        self.respond(vehicles)
    }
}
