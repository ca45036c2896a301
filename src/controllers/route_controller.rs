use std::sync::Arc;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::route_dto::{
    AddStopRequest, EstimateCostRequest, PlanRouteRequest, RemoveStopRequest, RouteQuery,
    StopsResponse, ValidateRouteRequest,
};
use crate::models::route::{NewRoute, Route};
use crate::services::cost_estimator::{estimate_cost_breakdown, CostBreakdown};
use crate::services::notifications::NotificationBuffer;
use crate::services::route_draft::RouteDraft;
use crate::services::route_planner::{PlannedRoute, RoutePlanner};
use crate::services::route_service::RouteService;
use crate::services::route_validation::{check_route, validate_route, RouteValidation};
use crate::services::stop_sequencer;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct RouteController {
    service: RouteService,
    planner: RoutePlanner,
    notifications: Arc<NotificationBuffer>,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        let notifications = Arc::new(NotificationBuffer::new());
        Self {
            service: RouteService::new(state.store.clone(), notifications.clone()),
            planner: RoutePlanner::new(state.directions.clone(), state.store.clone()),
            notifications,
        }
    }

    fn failure_message(&self, fallback: &str) -> String {
        self.notifications
            .last_error()
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn add_stop(&self, request: AddStopRequest) -> Result<ApiResponse<StopsResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let stops = stop_sequencer::add_stop(&request.stops, request.stop);
        Ok(ApiResponse::success(StopsResponse { stops, removed: None }))
    }

    pub fn remove_stop(&self, request: RemoveStopRequest) -> Result<ApiResponse<StopsResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let mut draft = RouteDraft::from_stops("", request.stops);
        let removed = draft.remove_stop(&request.stop_id);
        Ok(ApiResponse::success(StopsResponse {
            stops: draft.stops().to_vec(),
            removed: Some(removed),
        }))
    }

    pub fn validate(&self, request: ValidateRouteRequest) -> Result<ApiResponse<RouteValidation>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        Ok(ApiResponse::success(validate_route(
            &request.stops,
            request.name.as_deref(),
        )))
    }

    pub fn estimate_cost(&self, request: EstimateCostRequest) -> Result<ApiResponse<CostBreakdown>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        Ok(ApiResponse::success(estimate_cost_breakdown(
            request.distance,
            request.duration,
            request.vehicle_type.as_deref(),
            request.avoid_tolls,
        )))
    }

    pub async fn plan(&self, request: PlanRouteRequest) -> Result<ApiResponse<PlannedRoute>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let planned = self.planner.plan(&request.into_draft()).await?;
        Ok(ApiResponse::success(planned))
    }

    /// Los fallos de validación salen como error 422; los de almacenamiento
    /// como respuesta con `success: false` y el aviso para el usuario
    pub async fn save(&self, route: NewRoute) -> Result<ApiResponse<Route>, AppError> {
        route.validate().map_err(AppError::Validation)?;
        check_route(&route.stops, route.name.as_deref())?;

        match self.service.save_route(&route).await {
            Some(saved) => Ok(ApiResponse::success_with_message(
                saved,
                "Route saved".to_string(),
            )),
            None => Ok(ApiResponse::error(
                self.failure_message("There was a problem saving the route"),
            )),
        }
    }

    pub async fn list(&self, query: RouteQuery) -> Result<ApiResponse<Vec<Route>>, AppError> {
        let filter = query.into_filter()?;
        let filter = (!filter.is_empty()).then_some(filter);

        let routes = self.service.fetch_routes(filter.as_ref()).await;
        Ok(match self.notifications.last_error() {
            Some(message) => ApiResponse::error_with_data(routes, message),
            None => ApiResponse::success(routes),
        })
    }
}
