use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::route::{OptimizationPriority, RouteConstraints, RouteFilter, RouteStatus, TimeWindow};
use crate::models::stop::Stop;
use crate::services::route_draft::RouteDraft;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_date;

fn placeholder_stops() -> Vec<Stop> {
    RouteDraft::default().stops().to_vec()
}

// Request para añadir una parada al snapshot actual
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddStopRequest {
    #[serde(default = "placeholder_stops")]
    #[validate]
    pub stops: Vec<Stop>,
    #[validate]
    pub stop: Stop,
}

// Request para quitar un punto intermedio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveStopRequest {
    #[validate]
    pub stops: Vec<Stop>,
    #[validate(length(min = 1))]
    pub stop_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopsResponse {
    pub stops: Vec<Stop>,
    /// Solo en borrados: `false` si la parada estaba protegida o no existía
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRouteRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[validate]
    pub stops: Vec<Stop>,
}

// Los límites coinciden con cost_estimator::MAX_COST_INPUT
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EstimateCostRequest {
    /// Metros
    #[validate(range(min = -1.0e15, max = 1.0e15))]
    pub distance: f64,
    /// Segundos
    #[validate(range(min = -1.0e15, max = 1.0e15))]
    pub duration: f64,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub avoid_tolls: Option<bool>,
}

// Request para planificar: el borrador completo tal como lo edita el cliente
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlanRouteRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time_window: TimeWindow,
    #[validate]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub optimization_priority: OptimizationPriority,
    #[serde(default)]
    pub constraints: RouteConstraints,
}

impl PlanRouteRequest {
    pub fn into_draft(self) -> RouteDraft {
        let mut draft = RouteDraft::from_stops(self.name, self.stops);
        draft.date = self.date;
        draft.time_window = self.time_window;
        draft.driver_id = self.driver_id;
        draft.vehicle_id = self.vehicle_id;
        draft.optimization_priority = self.optimization_priority;
        draft.constraints = self.constraints;
        draft
    }
}

// Query string de GET /api/routes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub driver: Option<String>,
    #[serde(alias = "date_from")]
    pub date_from: Option<String>,
    #[serde(alias = "date_to")]
    pub date_to: Option<String>,
    pub status: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RouteQuery {
    pub fn into_filter(self) -> AppResult<RouteFilter> {
        let mut errors = ValidationErrors::new();

        let mut parse_date = |field: &'static str, value: Option<&str>| -> Option<NaiveDate> {
            value.and_then(|raw| match validate_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.add(field, e);
                    None
                }
            })
        };
        let date_from = parse_date("dateFrom", non_empty(&self.date_from));
        let date_to = parse_date("dateTo", non_empty(&self.date_to));

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let status = non_empty(&self.status)
            .map(RouteStatus::from_str)
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(RouteFilter {
            driver: non_empty(&self.driver).map(str::to_string),
            date_from,
            date_to,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_query_into_filter() {
        let query = RouteQuery {
            driver: Some("  ana ".to_string()),
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("".to_string()),
            status: Some("in_progress".to_string()),
        };

        let filter = query.into_filter().unwrap();
        assert_eq!(filter.driver.as_deref(), Some("ana"));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filter.date_to, None);
        assert_eq!(filter.status, Some(RouteStatus::InProgress));
    }

    #[test]
    fn test_route_query_rejects_bad_values() {
        let bad_date = RouteQuery { date_to: Some("03/01/2024".to_string()), ..Default::default() };
        assert!(matches!(bad_date.into_filter(), Err(AppError::Validation(_))));

        let bad_status = RouteQuery { status: Some("lost".to_string()), ..Default::default() };
        assert!(matches!(bad_status.into_filter(), Err(AppError::BadRequest(_))));

        assert!(RouteQuery::default().into_filter().unwrap().is_empty());
    }

    #[test]
    fn test_estimate_cost_request_bounds() {
        let ok: EstimateCostRequest =
            serde_json::from_value(serde_json::json!({ "distance": 4500000.0, "duration": 162000.0 })).unwrap();
        assert!(ok.validate().is_ok());

        let huge: EstimateCostRequest =
            serde_json::from_value(serde_json::json!({ "distance": 7.0e28, "duration": 0.0 })).unwrap();
        assert!(huge.validate().unwrap_err().field_errors().contains_key("distance"));
    }

    #[test]
    fn test_add_stop_request_defaults_to_placeholders() {
        let request: AddStopRequest = serde_json::from_value(serde_json::json!({
            "stop": { "id": "a", "address": "Depot", "type": "waypoint", "latitude": 48.85, "longitude": 2.35 }
        }))
        .unwrap();

        assert_eq!(request.stops.len(), 2);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_plan_request_into_draft() {
        let request: PlanRouteRequest = serde_json::from_value(serde_json::json!({
            "name": "Morning",
            "stops": [],
            "optimizationPriority": "fastest",
            "constraints": { "avoidTolls": true }
        }))
        .unwrap();

        let draft = request.into_draft();
        assert_eq!(draft.name, "Morning");
        assert!(draft.stops().is_empty());
        assert_eq!(draft.optimization_priority, OptimizationPriority::Fastest);
        assert!(draft.constraints.avoid_tolls);
        assert!(draft.constraints.allow_u_turns);
    }
}
