use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::api_response::ApiResponse;
use crate::models::driver::Driver;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/drivers", get(list_drivers))
        .route("/vehicles", get(list_vehicles))
}

async fn list_drivers(State(state): State<AppState>) -> Json<ApiResponse<Vec<Driver>>> {
    let controller = FleetController::new(&state);
    Json(controller.list_drivers().await)
}

async fn list_vehicles(State(state): State<AppState>) -> Json<ApiResponse<Vec<Vehicle>>> {
    let controller = FleetController::new(&state);
    Json(controller.list_vehicles().await)
}
