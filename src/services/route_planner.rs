//! Planificador de rutas
//!
//! Une el borrador, el proveedor de direcciones y el estimador de costes:
//! valida, pide distancia y duración en orden de visita y devuelve la ruta
//! lista para guardar con los totales rellenos.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::route::NewRoute;
use crate::models::stop::{Stop, StopType};
use crate::models::vehicle::Vehicle;
use crate::repositories::route_repository::RouteStore;
use crate::services::cost_estimator::{estimate_cost_breakdown, CostBreakdown};
use crate::services::directions_service::{DirectionsOptions, DirectionsProvider};
use crate::services::route_draft::RouteDraft;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRoute {
    /// Metros
    pub distance: f64,
    /// Segundos
    pub duration: f64,
    pub estimated_cost: Decimal,
    pub cost_breakdown: CostBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
    pub route: NewRoute,
}

pub struct RoutePlanner {
    directions: Arc<dyn DirectionsProvider>,
    store: Arc<dyn RouteStore>,
}

/// Origen, puntos intermedios en el orden de la lista y destino.
/// Las paradas sin coordenadas no participan.
pub fn visit_order(stops: &[Stop]) -> Vec<(f64, f64)> {
    let of_type = |stop_type: StopType| {
        stops
            .iter()
            .filter(move |s| s.stop_type == stop_type)
            .filter_map(Stop::coordinates)
    };

    of_type(StopType::Origin)
        .take(1)
        .chain(of_type(StopType::Waypoint))
        .chain(of_type(StopType::Destination).take(1))
        .collect()
}

impl RoutePlanner {
    pub fn new(directions: Arc<dyn DirectionsProvider>, store: Arc<dyn RouteStore>) -> Self {
        Self { directions, store }
    }

    /// El tipo de vehículo solo afina el coste; si no se puede leer se usa
    /// el estándar
    async fn vehicle_type(&self, vehicle_id: Option<Uuid>) -> Option<String> {
        let id = vehicle_id?;
        match self.store.select_vehicles(Some(std::slice::from_ref(&id))).await {
            Ok(rows) => rows
                .into_iter()
                .next()
                .and_then(|row| Vehicle::try_from(row).ok())
                .and_then(|v| v.vehicle_type),
            Err(e) => {
                log::warn!("⚠️ No se pudo leer el vehículo {}: {}", id, e);
                None
            }
        }
    }

    pub async fn plan(&self, draft: &RouteDraft) -> AppResult<PlannedRoute> {
        draft.check()?;

        let coordinates = visit_order(draft.stops());
        if coordinates.len() < 2 {
            return Err(AppError::BadRequest(
                "At least two geolocated stops are required to plan a route".to_string(),
            ));
        }

        let options = DirectionsOptions {
            priority: draft.optimization_priority,
            constraints: draft.constraints,
        };
        let directions = self.directions.directions(&coordinates, &options).await?;

        let vehicle_type = self.vehicle_type(draft.vehicle_id).await;
        let breakdown = estimate_cost_breakdown(
            directions.distance_meters,
            directions.duration_seconds,
            vehicle_type.as_deref(),
            Some(draft.constraints.avoid_tolls),
        );

        log::info!(
            "🧭 Ruta '{}' planificada: {:.0} m, {:.0} s, coste {}",
            draft.name.trim(),
            directions.distance_meters,
            directions.duration_seconds,
            breakdown.total_cost
        );

        let mut route = draft.to_new_route();
        route.distance = Some(directions.distance_meters);
        route.duration = Some(directions.duration_seconds);
        route.estimated_cost = Some(breakdown.total_cost);

        Ok(PlannedRoute {
            distance: directions.distance_meters,
            duration: directions.duration_seconds,
            estimated_cost: breakdown.total_cost,
            cost_breakdown: breakdown,
            geometry: directions.geometry,
            route,
        })
    }
}
