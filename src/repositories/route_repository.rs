use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::route::RouteFilter;
use crate::repositories::rows::{
    DriverRow, NewRouteRow, NewRouteStopRow, RouteRow, RouteStopRow, VehicleRow, DRIVER_COLUMNS,
    ROUTE_COLUMNS, ROUTE_STOP_COLUMNS, VEHICLE_COLUMNS,
};
use crate::utils::errors::AppError;

/// Almacén de rutas orientado a filas
///
/// `select_routes` puede aplicar el filtro total o parcialmente; quien llama
/// vuelve a aplicarlo sobre las rutas hidratadas.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Inserta cabecera y paradas como una sola escritura
    async fn insert_route(
        &self,
        route: NewRouteRow,
        stops: Vec<NewRouteStopRow>,
    ) -> Result<(RouteRow, Vec<RouteStopRow>), AppError>;

    async fn select_routes(&self, filter: &RouteFilter) -> Result<Vec<RouteRow>, AppError>;

    async fn select_stops(&self, route_ids: &[Uuid]) -> Result<Vec<RouteStopRow>, AppError>;

    /// `None` devuelve todos los conductores
    async fn select_drivers(&self, ids: Option<&[Uuid]>) -> Result<Vec<DriverRow>, AppError>;

    /// `None` devuelve todos los vehículos
    async fn select_vehicles(&self, ids: Option<&[Uuid]>) -> Result<Vec<VehicleRow>, AppError>;
}

pub struct PgRouteStore {
    pool: PgPool,
}

impl PgRouteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapa comodines de LIKE en texto del usuario
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl RouteStore for PgRouteStore {
    async fn insert_route(
        &self,
        route: NewRouteRow,
        stops: Vec<NewRouteStopRow>,
    ) -> Result<(RouteRow, Vec<RouteStopRow>), AppError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let route_row = sqlx::query_as::<_, RouteRow>(&format!(
            r#"
            INSERT INTO routes (id, name, route_date, time_window_start, time_window_end, driver_id,
                vehicle_id, optimization_priority, constraints, distance, duration, estimated_cost, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        ))
        .bind(id)
        .bind(&route.name)
        .bind(route.route_date)
        .bind(route.time_window_start)
        .bind(route.time_window_end)
        .bind(route.driver_id)
        .bind(route.vehicle_id)
        .bind(&route.optimization_priority)
        .bind(Json(&route.constraints))
        .bind(route.distance)
        .bind(route.duration)
        .bind(route.estimated_cost)
        .bind(&route.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("❌ Error insertando ruta '{}': {}", route.name, e);
            AppError::Database(e)
        })?;

        let insert_stop = format!(
            r#"
            INSERT INTO route_stops (route_id, stop_id, order_index, address, stop_type,
                latitude, longitude, arrival_time, departure_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ROUTE_STOP_COLUMNS
        );

        let mut stop_rows = Vec::with_capacity(stops.len());
        for stop in stops {
            let row = sqlx::query_as::<_, RouteStopRow>(&insert_stop)
                .bind(route_row.id)
                .bind(stop.stop_id)
                .bind(stop.order_index)
                .bind(stop.address)
                .bind(stop.stop_type)
                .bind(stop.latitude)
                .bind(stop.longitude)
                .bind(stop.arrival_time)
                .bind(stop.departure_time)
                .fetch_one(&mut *tx)
                .await?;
            stop_rows.push(row);
        }

        tx.commit().await?;

        log::info!("💾 Ruta {} guardada con {} paradas", route_row.id, stop_rows.len());
        Ok((route_row, stop_rows))
    }

    async fn select_routes(&self, filter: &RouteFilter) -> Result<Vec<RouteRow>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM routes WHERE 1 = 1", ROUTE_COLUMNS));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(from) = filter.date_from {
            query.push(" AND route_date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND route_date <= ").push_bind(to);
        }
        if let Some(driver) = filter.driver.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            let pattern = like_pattern(driver);
            query
                .push(" AND driver_id IN (SELECT id FROM drivers WHERE first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY route_date DESC NULLS LAST, created_at DESC");

        let rows = query
            .build_query_as::<RouteRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn select_stops(&self, route_ids: &[Uuid]) -> Result<Vec<RouteStopRow>, AppError> {
        if route_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = sqlx::query_as::<_, RouteStopRow>(&format!(
            "SELECT {} FROM route_stops WHERE route_id = ANY($1) ORDER BY route_id, order_index",
            ROUTE_STOP_COLUMNS
        ))
        .bind(route_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn select_drivers(&self, ids: Option<&[Uuid]>) -> Result<Vec<DriverRow>, AppError> {
        let rows = match ids {
            Some([]) => vec![],
            Some(ids) => {
                sqlx::query_as::<_, DriverRow>(&format!(
                    "SELECT {} FROM drivers WHERE id = ANY($1)",
                    DRIVER_COLUMNS
                ))
                .bind(ids)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DriverRow>(&format!(
                    "SELECT {} FROM drivers ORDER BY last_name, first_name",
                    DRIVER_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn select_vehicles(&self, ids: Option<&[Uuid]>) -> Result<Vec<VehicleRow>, AppError> {
        let rows = match ids {
            Some([]) => vec![],
            Some(ids) => {
                sqlx::query_as::<_, VehicleRow>(&format!(
                    "SELECT {} FROM vehicles WHERE id = ANY($1)",
                    VEHICLE_COLUMNS
                ))
                .bind(ids)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, VehicleRow>(&format!(
                    "SELECT {} FROM vehicles ORDER BY name",
                    VEHICLE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }
}
