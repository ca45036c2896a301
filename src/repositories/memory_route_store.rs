//! Almacén en memoria
//!
//! Implementación de `RouteStore` sin base de datos, para desarrollo local y
//! tests. Devuelve todas las rutas y deja el filtrado a `RouteService`.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::route::RouteFilter;
use crate::repositories::route_repository::RouteStore;
use crate::repositories::rows::{
    DriverRow, NewRouteRow, NewRouteStopRow, RouteRow, RouteStopRow, VehicleRow,
};
use crate::utils::errors::AppError;

#[derive(Clone, Default)]
pub struct InMemoryRouteStore {
    routes: Arc<RwLock<Vec<RouteRow>>>,
    stops: Arc<RwLock<Vec<RouteStopRow>>>,
    drivers: Arc<RwLock<Vec<DriverRow>>>,
    vehicles: Arc<RwLock<Vec<VehicleRow>>>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_driver(&self, driver: DriverRow) {
        self.drivers.write().await.push(driver);
    }

    pub async fn add_vehicle(&self, vehicle: VehicleRow) {
        self.vehicles.write().await.push(vehicle);
    }

    /// Inserta una fila tal cual, sin pasar por validación.
    /// Ambos cerrojos se toman antes de escribir: quien lea las rutas ya ve
    /// sus paradas.
    pub async fn add_route_row(&self, route: RouteRow, stops: Vec<RouteStopRow>) {
        let mut routes = self.routes.write().await;
        let mut stop_rows = self.stops.write().await;
        routes.push(route);
        stop_rows.extend(stops);
    }

    pub async fn route_count(&self) -> usize {
        self.routes.read().await.len()
    }

    pub async fn stop_rows(&self, route_id: Uuid) -> Vec<RouteStopRow> {
        self.stops
            .read()
            .await
            .iter()
            .filter(|s| s.route_id == route_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn insert_route(
        &self,
        route: NewRouteRow,
        stops: Vec<NewRouteStopRow>,
    ) -> Result<(RouteRow, Vec<RouteStopRow>), AppError> {
        let now = Utc::now();
        let route_row = RouteRow {
            id: Uuid::new_v4(),
            name: Some(route.name),
            route_date: route.route_date,
            time_window_start: route.time_window_start,
            time_window_end: route.time_window_end,
            driver_id: route.driver_id,
            vehicle_id: route.vehicle_id,
            optimization_priority: Some(route.optimization_priority),
            constraints: Some(sqlx::types::Json(route.constraints)),
            distance: route.distance,
            duration: route.duration,
            estimated_cost: route.estimated_cost,
            status: Some(route.status),
            created_at: now,
            updated_at: now,
        };

        let stop_rows: Vec<RouteStopRow> = stops
            .into_iter()
            .map(|s| RouteStopRow {
                route_id: route_row.id,
                stop_id: s.stop_id,
                order_index: s.order_index,
                address: Some(s.address),
                stop_type: Some(s.stop_type),
                latitude: s.latitude,
                longitude: s.longitude,
                arrival_time: s.arrival_time,
                departure_time: s.departure_time,
            })
            .collect();

        self.add_route_row(route_row.clone(), stop_rows.clone()).await;
        Ok((route_row, stop_rows))
    }

    async fn select_routes(&self, _filter: &RouteFilter) -> Result<Vec<RouteRow>, AppError> {
        let mut rows = self.routes.read().await.clone();
        rows.sort_by(|a, b| b.route_date.cmp(&a.route_date).then(b.created_at.cmp(&a.created_at)));
        Ok(rows)
    }

    async fn select_stops(&self, route_ids: &[Uuid]) -> Result<Vec<RouteStopRow>, AppError> {
        let mut rows: Vec<RouteStopRow> = self
            .stops
            .read()
            .await
            .iter()
            .filter(|s| route_ids.contains(&s.route_id))
            .cloned()
            .collect();
        rows.sort_by_key(|s| (s.route_id, s.order_index));
        Ok(rows)
    }

    async fn select_drivers(&self, ids: Option<&[Uuid]>) -> Result<Vec<DriverRow>, AppError> {
        Ok(self
            .drivers
            .read()
            .await
            .iter()
            .filter(|d| ids.map_or(true, |ids| ids.contains(&d.id)))
            .cloned()
            .collect())
    }

    async fn select_vehicles(&self, ids: Option<&[Uuid]>) -> Result<Vec<VehicleRow>, AppError> {
        Ok(self
            .vehicles
            .read()
            .await
            .iter()
            .filter(|v| ids.map_or(true, |ids| ids.contains(&v.id)))
            .cloned()
            .collect())
    }
}
