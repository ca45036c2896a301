//! Borrador de ruta
//!
//! Estado de una ruta en construcción. Lo posee quien la está editando y cada
//! operación reemplaza la lista de paradas por el snapshot que devuelve el
//! secuenciador.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::route::{NewRoute, OptimizationPriority, RouteConstraints, RouteStatus, TimeWindow};
use crate::models::stop::Stop;
use crate::services::route_validation::{check_route, RouteValidation, RouteValidationError};
use crate::services::stop_sequencer::{self, StopSequenceError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time_window: TimeWindow,
    stops: Vec<Stop>,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub optimization_priority: OptimizationPriority,
    #[serde(default)]
    pub constraints: RouteConstraints,
}

impl Default for RouteDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: None,
            time_window: TimeWindow::default(),
            stops: vec![Stop::origin_placeholder(), Stop::destination_placeholder()],
            driver_id: None,
            vehicle_id: None,
            optimization_priority: OptimizationPriority::default(),
            constraints: RouteConstraints::default(),
        }
    }
}

impl RouteDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Reconstruye un borrador a partir de un snapshot de paradas
    pub fn from_stops(name: impl Into<String>, stops: Vec<Stop>) -> Self {
        Self {
            name: name.into(),
            stops,
            ..Default::default()
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn add_stop(&mut self, stop: Stop) -> &[Stop] {
        self.stops = stop_sequencer::add_stop(&self.stops, stop);
        &self.stops
    }

    /// Quita un punto intermedio. Devuelve `false` (sin cambios) para origen,
    /// destino o ids desconocidos.
    pub fn remove_stop(&mut self, stop_id: &str) -> bool {
        match stop_sequencer::remove_stop(&self.stops, stop_id) {
            Ok(stops) => {
                self.stops = stops;
                true
            }
            Err(StopSequenceError::ProtectedStop(id)) => {
                log::warn!("⚠️ Ignorando borrado de parada protegida '{}'", id);
                false
            }
            Err(StopSequenceError::UnknownStop(id)) => {
                log::debug!("Parada '{}' no encontrada en el borrador", id);
                false
            }
        }
    }

    pub fn check(&self) -> Result<(), RouteValidationError> {
        check_route(&self.stops, Some(&self.name))
    }

    pub fn validate(&self) -> RouteValidation {
        self.check().into()
    }

    /// Convierte el borrador en una ruta lista para guardar
    pub fn to_new_route(&self) -> NewRoute {
        NewRoute {
            name: Some(self.name.trim().to_string()),
            date: self.date,
            time_window: self.time_window,
            stops: self.stops.clone(),
            driver_id: self.driver_id,
            vehicle_id: self.vehicle_id,
            optimization_priority: self.optimization_priority,
            constraints: self.constraints,
            distance: None,
            duration: None,
            estimated_cost: None,
            status: RouteStatus::Planned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stop::StopType;

    fn located(id: &str, address: &str, lat: f64, lng: f64) -> Stop {
        Stop::new(id, address, StopType::Waypoint).with_coordinates(lat, lng)
    }

    #[test]
    fn test_new_draft_has_two_placeholders() {
        let draft = RouteDraft::new("Morning");
        assert_eq!(draft.stops().len(), 2);
        assert_eq!(draft.stops()[0].stop_type, StopType::Origin);
        assert_eq!(draft.stops()[1].stop_type, StopType::Destination);
        assert!(!draft.validate().is_valid);
    }

    #[test]
    fn test_draft_becomes_valid_after_two_stops() {
        let mut draft = RouteDraft::new("Cross Country");
        draft.add_stop(located("a", "NYC", 40.7, -74.0));
        assert_eq!(draft.check(), Err(RouteValidationError::DestinationNotGeolocated));

        draft.add_stop(located("b", "LA", 34.0, -118.2));
        assert!(draft.validate().is_valid);
    }

    #[test]
    fn test_remove_stop_is_noop_for_protected_ids() {
        let mut draft = RouteDraft::new("Loop");
        draft.add_stop(located("a", "A", 1.0, 1.0));
        draft.add_stop(located("b", "B", 2.0, 2.0));
        draft.add_stop(located("w", "W", 3.0, 3.0));

        assert!(!draft.remove_stop("origin"));
        assert!(!draft.remove_stop("destination"));
        assert_eq!(draft.stops().len(), 3);

        assert!(draft.remove_stop("w"));
        assert_eq!(draft.stops().len(), 2);
    }

    #[test]
    fn test_to_new_route_trims_name() {
        let mut draft = RouteDraft::new("  Weekly  ");
        draft.constraints.avoid_tolls = true;
        let route = draft.to_new_route();
        assert_eq!(route.name.as_deref(), Some("Weekly"));
        assert!(route.constraints.avoid_tolls);
        assert_eq!(route.status, RouteStatus::Planned);
    }
}
