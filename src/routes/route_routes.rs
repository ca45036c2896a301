use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::api_response::ApiResponse;
use crate::dto::route_dto::{
    AddStopRequest, EstimateCostRequest, PlanRouteRequest, RemoveStopRequest, RouteQuery,
    StopsResponse, ValidateRouteRequest,
};
use crate::models::route::{NewRoute, Route};
use crate::services::cost_estimator::CostBreakdown;
use crate::services::route_planner::PlannedRoute;
use crate::services::route_validation::RouteValidation;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_route).get(list_routes))
        .route("/stops", post(add_stop))
        .route("/stops/remove", post(remove_stop))
        .route("/validate", post(validate_route))
        .route("/estimate-cost", post(estimate_cost))
        .route("/plan", post(plan_route))
}

async fn add_stop(
    State(state): State<AppState>,
    Json(request): Json<AddStopRequest>,
) -> Result<Json<ApiResponse<StopsResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.add_stop(request)?;
    Ok(Json(response))
}

async fn remove_stop(
    State(state): State<AppState>,
    Json(request): Json<RemoveStopRequest>,
) -> Result<Json<ApiResponse<StopsResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.remove_stop(request)?;
    Ok(Json(response))
}

async fn validate_route(
    State(state): State<AppState>,
    Json(request): Json<ValidateRouteRequest>,
) -> Result<Json<ApiResponse<RouteValidation>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.validate(request)?;
    Ok(Json(response))
}

async fn estimate_cost(
    State(state): State<AppState>,
    Json(request): Json<EstimateCostRequest>,
) -> Result<Json<ApiResponse<CostBreakdown>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.estimate_cost(request)?;
    Ok(Json(response))
}

async fn plan_route(
    State(state): State<AppState>,
    Json(request): Json<PlanRouteRequest>,
) -> Result<Json<ApiResponse<PlannedRoute>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.plan(request).await?;
    Ok(Json(response))
}

async fn save_route(
    State(state): State<AppState>,
    Json(route): Json<NewRoute>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), AppError> {
    let controller = RouteController::new(&state);
    let response = controller.save(route).await?;
    let status = if response.success {
        StatusCode::CREATED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(response)))
}

async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<ApiResponse<Vec<Route>>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}
