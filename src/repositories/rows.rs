//! Filas de la base de datos
//!
//! Cada tabla tiene su struct con la lista completa de columnas. Las
//! conversiones al modelo de dominio validan en la frontera: una fila sin los
//! campos obligatorios se rechaza en lugar de rellenarse en silencio.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::driver::{Driver, DEFAULT_MAX_HOURS};
use crate::models::route::{NewRoute, OptimizationPriority, RouteConstraints, RouteStatus, TimeWindow};
use crate::models::stop::{Stop, StopType};
use crate::models::vehicle::{Vehicle, DEFAULT_FUEL_EFFICIENCY};
use crate::utils::errors::{invalid_row, AppError};

pub const ROUTE_COLUMNS: &str = "id, name, route_date, time_window_start, time_window_end, \
    driver_id, vehicle_id, optimization_priority, constraints, distance, duration, \
    estimated_cost, status, created_at, updated_at";

pub const ROUTE_STOP_COLUMNS: &str = "route_id, stop_id, order_index, address, stop_type, \
    latitude, longitude, arrival_time, departure_time";

pub const DRIVER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, license_number, status, max_hours";

pub const VEHICLE_COLUMNS: &str =
    "id, name, license_plate, vehicle_type, capacity, status, fuel_efficiency";

/// Fila de la tabla routes
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub route_date: Option<NaiveDate>,
    pub time_window_start: Option<NaiveTime>,
    pub time_window_end: Option<NaiveTime>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub optimization_priority: Option<String>,
    pub constraints: Option<Json<serde_json::Value>>,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub estimated_cost: Option<Decimal>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Valores a insertar en routes; id y timestamps los pone el almacén
#[derive(Debug, Clone, PartialEq)]
pub struct NewRouteRow {
    pub name: String,
    pub route_date: Option<NaiveDate>,
    pub time_window_start: Option<NaiveTime>,
    pub time_window_end: Option<NaiveTime>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub optimization_priority: String,
    pub constraints: serde_json::Value,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub estimated_cost: Option<Decimal>,
    pub status: String,
}

/// Fila de la tabla route_stops
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteStopRow {
    pub route_id: Uuid,
    pub stop_id: String,
    pub order_index: i32,
    pub address: Option<String>,
    pub stop_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
}

/// Valores a insertar en route_stops; route_id lo asigna la inserción
#[derive(Debug, Clone, PartialEq)]
pub struct NewRouteStopRow {
    pub stop_id: String,
    pub order_index: i32,
    pub address: String,
    pub stop_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DriverRow {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub max_hours: Option<i32>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub license_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub capacity: Option<f64>,
    pub status: Option<String>,
    pub fuel_efficiency: Option<f64>,
}

/// Cabecera de ruta ya validada, sin paradas ni referencias resueltas
#[derive(Debug, Clone, PartialEq)]
pub struct RouteHeader {
    pub id: Uuid,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time_window: TimeWindow,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub optimization_priority: OptimizationPriority,
    pub constraints: RouteConstraints,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub estimated_cost: Option<Decimal>,
    pub status: RouteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn required_text(table: &'static str, field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(invalid_row(table, format!("missing {}", field))),
    }
}

impl TryFrom<RouteRow> for RouteHeader {
    type Error = AppError;

    fn try_from(row: RouteRow) -> Result<Self, Self::Error> {
        let name = required_text("routes", "name", row.name)?;

        let status = row
            .status
            .ok_or_else(|| invalid_row("routes", "missing status"))?
            .parse::<RouteStatus>()
            .map_err(|e| invalid_row("routes", e))?;

        let optimization_priority = row
            .optimization_priority
            .ok_or_else(|| invalid_row("routes", "missing optimization_priority"))?
            .parse::<OptimizationPriority>()
            .map_err(|e| invalid_row("routes", e))?;

        // columna jsonb opcional: sin valor usamos las restricciones por defecto
        let constraints = match row.constraints {
            Some(Json(value)) => serde_json::from_value::<RouteConstraints>(value)
                .map_err(|e| invalid_row("routes", format!("invalid constraints: {}", e)))?,
            None => RouteConstraints::default(),
        };

        Ok(Self {
            id: row.id,
            name,
            date: row.route_date,
            time_window: TimeWindow {
                start: row.time_window_start,
                end: row.time_window_end,
            },
            driver_id: row.driver_id,
            vehicle_id: row.vehicle_id,
            optimization_priority,
            constraints,
            distance: row.distance,
            duration: row.duration,
            estimated_cost: row.estimated_cost,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&NewRoute> for NewRouteRow {
    type Error = AppError;

    fn try_from(route: &NewRoute) -> Result<Self, Self::Error> {
        let name = route
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid_row("routes", "missing name"))?;

        let constraints = serde_json::to_value(route.constraints)
            .map_err(|e| AppError::Internal(format!("Error serializing constraints: {}", e)))?;

        Ok(Self {
            name: name.to_string(),
            route_date: route.date,
            time_window_start: route.time_window.start,
            time_window_end: route.time_window.end,
            driver_id: route.driver_id,
            vehicle_id: route.vehicle_id,
            optimization_priority: route.optimization_priority.as_str().to_string(),
            constraints,
            distance: route.distance,
            duration: route.duration,
            estimated_cost: route.estimated_cost,
            status: route.status.as_str().to_string(),
        })
    }
}

impl NewRouteStopRow {
    pub fn from_stop(stop: &Stop, order_index: i32) -> Self {
        Self {
            stop_id: stop.id.clone(),
            order_index,
            address: stop.address.clone(),
            stop_type: stop.stop_type.as_str().to_string(),
            latitude: stop.latitude,
            longitude: stop.longitude,
            arrival_time: stop.arrival_time,
            departure_time: stop.departure_time,
        }
    }
}

/// Filas de paradas en el orden en que se guardaron, una por posición
pub fn stop_rows_for(stops: &[Stop]) -> Result<Vec<NewRouteStopRow>, AppError> {
    stops
        .iter()
        .enumerate()
        .map(|(idx, stop)| {
            let order_index = i32::try_from(idx)
                .map_err(|_| AppError::BadRequest("Too many stops in route".to_string()))?;
            Ok(NewRouteStopRow::from_stop(stop, order_index))
        })
        .collect()
}

impl TryFrom<RouteStopRow> for Stop {
    type Error = AppError;

    fn try_from(row: RouteStopRow) -> Result<Self, Self::Error> {
        if row.stop_id.trim().is_empty() {
            return Err(invalid_row("route_stops", "missing stop_id"));
        }

        let stop_type = row
            .stop_type
            .ok_or_else(|| invalid_row("route_stops", "missing stop_type"))?
            .parse::<StopType>()
            .map_err(|e| invalid_row("route_stops", e))?;

        Ok(Stop {
            id: row.stop_id,
            address: row.address.unwrap_or_default(),
            stop_type,
            latitude: row.latitude,
            longitude: row.longitude,
            arrival_time: row.arrival_time,
            departure_time: row.departure_time,
        })
    }
}

impl TryFrom<DriverRow> for Driver {
    type Error = AppError;

    fn try_from(row: DriverRow) -> Result<Self, Self::Error> {
        Ok(Driver {
            id: row.id,
            first_name: required_text("drivers", "first_name", row.first_name)?,
            last_name: required_text("drivers", "last_name", row.last_name)?,
            email: row.email,
            phone: row.phone,
            license_number: row.license_number,
            status: row.status,
            max_hours: row.max_hours.unwrap_or(DEFAULT_MAX_HOURS),
        })
    }
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = AppError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Vehicle {
            id: row.id,
            name: required_text("vehicles", "name", row.name)?,
            license_plate: row.license_plate,
            vehicle_type: row.vehicle_type,
            capacity: row.capacity,
            status: row.status,
            fuel_efficiency: row.fuel_efficiency.unwrap_or(DEFAULT_FUEL_EFFICIENCY),
        })
    }
}
