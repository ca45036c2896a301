//! Adaptador de persistencia de rutas
//!
//! Traduce entre el modelo Route/Stop y las filas del almacén. Los métodos
//! `try_*` propagan errores; los públicos sin prefijo los capturan, los
//! registran, avisan al usuario y devuelven `None` o una lista vacía.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::route::{NewRoute, Route, RouteFilter};
use crate::models::stop::Stop;
use crate::models::vehicle::Vehicle;
use crate::repositories::route_repository::RouteStore;
use crate::repositories::rows::{stop_rows_for, NewRouteRow, RouteHeader, RouteStopRow};
use crate::services::notifications::{Notification, Notifier};
use crate::services::route_validation::check_route;
use crate::utils::errors::{AppError, AppResult};

pub struct RouteService {
    store: Arc<dyn RouteStore>,
    notifier: Arc<dyn Notifier>,
}

fn unique_ids(ids: impl Iterator<Item = Option<Uuid>>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.flatten().filter(|id| seen.insert(*id)).collect()
}

/// Convierte filas descartando (con aviso en log) las que no pasan validación
fn map_valid<R, T>(rows: Vec<R>, entity: &str) -> Vec<T>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("⚠️ Descartando {} inválido: {}", entity, e);
                None
            }
        })
        .collect()
}

fn stops_from_rows(mut rows: Vec<RouteStopRow>) -> AppResult<Vec<Stop>> {
    rows.sort_by_key(|r| r.order_index);
    rows.into_iter().map(Stop::try_from).collect()
}

impl RouteService {
    pub fn new(store: Arc<dyn RouteStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    fn assemble(
        header: RouteHeader,
        stops: Vec<Stop>,
        driver: Option<Driver>,
        vehicle: Option<Vehicle>,
    ) -> Route {
        Route {
            id: header.id,
            name: header.name,
            date: header.date,
            time_window: header.time_window,
            stops,
            driver,
            vehicle,
            optimization_priority: header.optimization_priority,
            constraints: header.constraints,
            distance: header.distance,
            duration: header.duration,
            estimated_cost: header.estimated_cost,
            status: header.status,
            created_at: header.created_at,
            updated_at: header.updated_at,
        }
    }

    /// Referencias de una ruta ya guardada: un fallo de lectura deja la
    /// referencia vacía en vez de deshacer el guardado
    async fn find_driver(&self, id: Option<Uuid>) -> Option<Driver> {
        let id = id?;
        match self.store.select_drivers(Some(std::slice::from_ref(&id))).await {
            Ok(rows) => map_valid::<_, Driver>(rows, "driver").into_iter().next(),
            Err(e) => {
                log::warn!("⚠️ No se pudo leer el conductor {}: {}", id, e);
                None
            }
        }
    }

    async fn find_vehicle(&self, id: Option<Uuid>) -> Option<Vehicle> {
        let id = id?;
        match self.store.select_vehicles(Some(std::slice::from_ref(&id))).await {
            Ok(rows) => map_valid::<_, Vehicle>(rows, "vehicle").into_iter().next(),
            Err(e) => {
                log::warn!("⚠️ No se pudo leer el vehículo {}: {}", id, e);
                None
            }
        }
    }

    /// Valida y guarda la ruta: primero la cabecera, luego las paradas con su
    /// `order_index` según la posición en `route.stops`. Tras la inserción no
    /// hay más errores posibles.
    pub async fn try_save_route(&self, route: &NewRoute) -> AppResult<Route> {
        check_route(&route.stops, route.name.as_deref())?;

        let header = NewRouteRow::try_from(route)?;
        let stop_rows = stop_rows_for(&route.stops)?;
        let name = header.name.clone();

        log::info!("🚚 Guardando ruta '{}' con {} paradas", name, stop_rows.len());

        let (route_row, _) = self.store.insert_route(header, stop_rows).await?;

        let driver = self.find_driver(route.driver_id).await;
        let vehicle = self.find_vehicle(route.vehicle_id).await;

        if let Some(driver) = &driver {
            log::info!("👤 Ruta {} asignada a {}", route_row.id, driver.full_name());
        }

        Ok(Route {
            id: route_row.id,
            name,
            date: route.date,
            time_window: route.time_window,
            stops: route.stops.clone(),
            driver,
            vehicle,
            optimization_priority: route.optimization_priority,
            constraints: route.constraints,
            distance: route.distance,
            duration: route.duration,
            estimated_cost: route.estimated_cost,
            status: route.status,
            created_at: route_row.created_at,
            updated_at: route_row.updated_at,
        })
    }

    pub async fn save_route(&self, route: &NewRoute) -> Option<Route> {
        match self.try_save_route(route).await {
            Ok(saved) => {
                self.notifier.notify(Notification::success(
                    "Route saved",
                    format!("Route '{}' has been saved", saved.name),
                ));
                Some(saved)
            }
            Err(AppError::RouteValidation(e)) => {
                log::warn!("⚠️ Ruta rechazada por validación: {}", e);
                self.notifier.notify(Notification::error("Invalid route", e.to_string()));
                None
            }
            Err(e) => {
                log::error!("❌ Error guardando ruta: {}", e);
                self.notifier.notify(Notification::error(
                    "Error",
                    "There was a problem saving the route",
                ));
                None
            }
        }
    }

    /// Rutas con sus paradas, conductor y vehículo, filtradas
    pub async fn try_fetch_routes(&self, filter: Option<&RouteFilter>) -> AppResult<Vec<Route>> {
        let filter = filter.cloned().unwrap_or_default();

        let rows = self.store.select_routes(&filter).await?;
        let headers: Vec<RouteHeader> = map_valid(rows, "route");
        if headers.is_empty() {
            return Ok(vec![]);
        }

        let route_ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let driver_ids = unique_ids(headers.iter().map(|h| h.driver_id));
        let vehicle_ids = unique_ids(headers.iter().map(|h| h.vehicle_id));

        let (stop_rows, driver_rows, vehicle_rows) = futures::try_join!(
            self.store.select_stops(&route_ids),
            self.store.select_drivers(Some(driver_ids.as_slice())),
            self.store.select_vehicles(Some(vehicle_ids.as_slice())),
        )?;

        let mut stops_by_route: HashMap<Uuid, Vec<RouteStopRow>> = HashMap::new();
        for row in stop_rows {
            stops_by_route.entry(row.route_id).or_default().push(row);
        }

        let drivers: HashMap<Uuid, Driver> = map_valid::<_, Driver>(driver_rows, "driver")
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        let vehicles: HashMap<Uuid, Vehicle> = map_valid::<_, Vehicle>(vehicle_rows, "vehicle")
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let mut routes = Vec::with_capacity(headers.len());
        for header in headers {
            let stops = match stops_from_rows(stops_by_route.remove(&header.id).unwrap_or_default()) {
                Ok(stops) => stops,
                Err(e) => {
                    log::warn!("⚠️ Descartando ruta {} con paradas inválidas: {}", header.id, e);
                    continue;
                }
            };
            let driver = header.driver_id.and_then(|id| drivers.get(&id).cloned());
            let vehicle = header.vehicle_id.and_then(|id| vehicles.get(&id).cloned());

            let route = Self::assemble(header, stops, driver, vehicle);
            if filter.matches(&route) {
                routes.push(route);
            }
        }

        log::info!("📋 {} rutas cargadas", routes.len());
        Ok(routes)
    }

    pub async fn fetch_routes(&self, filter: Option<&RouteFilter>) -> Vec<Route> {
        self.try_fetch_routes(filter).await.unwrap_or_else(|e| {
            log::error!("❌ Error cargando rutas: {}", e);
            self.notifier
                .notify(Notification::error("Error", "There was a problem loading routes"));
            vec![]
        })
    }

    pub async fn try_fetch_drivers(&self) -> AppResult<Vec<Driver>> {
        let rows = self.store.select_drivers(None).await?;
        Ok(map_valid(rows, "driver"))
    }

    pub async fn fetch_drivers(&self) -> Vec<Driver> {
        self.try_fetch_drivers().await.unwrap_or_else(|e| {
            log::error!("❌ Error cargando conductores: {}", e);
            self.notifier
                .notify(Notification::error("Error", "There was a problem loading drivers"));
            vec![]
        })
    }

    pub async fn try_fetch_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let rows = self.store.select_vehicles(None).await?;
        Ok(map_valid(rows, "vehicle"))
    }

    pub async fn fetch_vehicles(&self) -> Vec<Vehicle> {
        self.try_fetch_vehicles().await.unwrap_or_else(|e| {
            log::error!("❌ Error cargando vehículos: {}", e);
            self.notifier
                .notify(Notification::error("Error", "There was a problem loading vehicles"));
            vec![]
        })
    }
}
