//! Secuenciador de paradas
//!
//! Decide qué papel toma cada ubicación nueva: primero rellena el hueco de
//! origen, después el de destino y a partir de ahí inserta puntos intermedios
//! justo antes del destino. Trabaja sobre snapshots: recibe una lista y
//! devuelve otra nueva.

use thiserror::Error;

use crate::models::stop::{Stop, StopType, DESTINATION_STOP_ID, ORIGIN_STOP_ID};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StopSequenceError {
    #[error("Stop '{0}' is the origin or destination and cannot be removed")]
    ProtectedStop(String),

    #[error("Stop '{0}' is not part of the route")]
    UnknownStop(String),
}

fn origin_slot_is_empty(stop: &Stop) -> bool {
    !stop.has_address() && stop.latitude.is_none() && stop.longitude.is_none()
}

fn destination_slot_is_empty(stop: &Stop) -> bool {
    !stop.has_address() && stop.latitude.is_none()
}

fn position_of(stops: &[Stop], stop_type: StopType) -> Option<usize> {
    stops.iter().position(|s| s.stop_type == stop_type)
}

fn is_protected(stop_id: &str) -> bool {
    stop_id == ORIGIN_STOP_ID || stop_id == DESTINATION_STOP_ID
}

/// Convierte la parada en punto intermedio. Si su id es protegido o ya está
/// en la ruta recibe `waypoint-N` con el primer N libre, para que
/// `remove_stop` pueda quitarla.
fn as_waypoint(stops: &[Stop], new_stop: Stop) -> Stop {
    let taken = |id: &str| is_protected(id) || stops.iter().any(|s| s.id == id);

    let id = if taken(&new_stop.id) {
        (1..)
            .map(|n| format!("waypoint-{}", n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_default()
    } else {
        new_stop.id
    };

    Stop {
        id,
        stop_type: StopType::Waypoint,
        ..new_stop
    }
}

/// Coloca `new_stop` en la ruta según el estado actual de los huecos
pub fn add_stop(current: &[Stop], new_stop: Stop) -> Vec<Stop> {
    let mut stops = current.to_vec();

    if let Some(idx) = position_of(&stops, StopType::Origin) {
        if origin_slot_is_empty(&stops[idx]) {
            stops[idx] = Stop {
                id: ORIGIN_STOP_ID.to_string(),
                stop_type: StopType::Origin,
                ..new_stop
            };
            return stops;
        }
    }

    match position_of(&stops, StopType::Destination) {
        Some(idx) if destination_slot_is_empty(&stops[idx]) => {
            stops[idx] = Stop {
                id: DESTINATION_STOP_ID.to_string(),
                stop_type: StopType::Destination,
                ..new_stop
            };
        }
        Some(idx) => {
            let waypoint = as_waypoint(&stops, new_stop);
            stops.insert(idx, waypoint);
        }
        // sin destino el punto intermedio queda al final
        None => {
            let waypoint = as_waypoint(&stops, new_stop);
            stops.push(waypoint);
        }
    }

    stops
}

/// Quita un punto intermedio; origen y destino no se pueden quitar
pub fn remove_stop(current: &[Stop], stop_id: &str) -> Result<Vec<Stop>, StopSequenceError> {
    if is_protected(stop_id) {
        return Err(StopSequenceError::ProtectedStop(stop_id.to_string()));
    }

    if !current.iter().any(|s| s.id == stop_id) {
        return Err(StopSequenceError::UnknownStop(stop_id.to_string()));
    }

    Ok(current.iter().filter(|s| s.id != stop_id).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders() -> Vec<Stop> {
        vec![Stop::origin_placeholder(), Stop::destination_placeholder()]
    }

    fn located(id: &str, address: &str) -> Stop {
        Stop::new(id, address, StopType::Waypoint).with_coordinates(48.85, 2.35)
    }

    fn ids(stops: &[Stop]) -> Vec<&str> {
        stops.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_first_second_third_additions() {
        let stops = add_stop(&placeholders(), located("a", "Depot"));
        assert_eq!(stops[0].id, "origin");
        assert_eq!(stops[0].stop_type, StopType::Origin);
        assert_eq!(stops[0].address, "Depot");
        assert_eq!(stops.len(), 2);

        let stops = add_stop(&stops, located("b", "Customer"));
        assert_eq!(stops[1].id, "destination");
        assert_eq!(stops[1].stop_type, StopType::Destination);
        assert_eq!(stops.len(), 2);

        let stops = add_stop(&stops, located("c", "Pickup"));
        assert_eq!(ids(&stops), vec!["origin", "c", "destination"]);
        assert_eq!(stops[1].stop_type, StopType::Waypoint);
    }

    #[test]
    fn test_waypoints_keep_insertion_order() {
        let mut stops = placeholders();
        for (id, address) in [("a", "A"), ("b", "B"), ("w1", "W1"), ("w2", "W2"), ("w3", "W3")] {
            stops = add_stop(&stops, located(id, address));
        }
        assert_eq!(ids(&stops), vec!["origin", "w1", "w2", "w3", "destination"]);
    }

    #[test]
    fn test_input_snapshot_is_untouched() {
        let before = placeholders();
        let after = add_stop(&before, located("a", "Depot"));
        assert_eq!(before, placeholders());
        assert_ne!(before, after);
    }

    #[test]
    fn test_destination_slot_filled_by_type_lookup() {
        // el destino vacío no está al final de la lista
        let stops = vec![
            Stop::destination_placeholder(),
            Stop::new("origin", "Depot", StopType::Origin).with_coordinates(1.0, 1.0),
        ];
        let stops = add_stop(&stops, located("x", "Customer"));
        assert_eq!(stops[0].id, "destination");
        assert_eq!(stops[0].address, "Customer");
    }

    #[test]
    fn test_origin_with_address_only_is_not_empty() {
        let stops = vec![
            Stop::new("origin", "Typed address", StopType::Origin),
            Stop::destination_placeholder(),
        ];
        let stops = add_stop(&stops, located("x", "Customer"));
        assert_eq!(stops[0].address, "Typed address");
        assert_eq!(stops[1].id, "destination");
    }

    #[test]
    fn test_remove_protected_stops_is_rejected() {
        let stops = add_stop(&placeholders(), located("a", "Depot"));
        assert_eq!(
            remove_stop(&stops, "origin"),
            Err(StopSequenceError::ProtectedStop("origin".to_string()))
        );
        assert_eq!(
            remove_stop(&stops, "destination"),
            Err(StopSequenceError::ProtectedStop("destination".to_string()))
        );
    }

    #[test]
    fn test_remove_waypoint() {
        let mut stops = placeholders();
        for (id, address) in [("a", "A"), ("b", "B"), ("w1", "W1"), ("w2", "W2")] {
            stops = add_stop(&stops, located(id, address));
        }
        let stops = remove_stop(&stops, "w1").unwrap();
        assert_eq!(ids(&stops), vec!["origin", "w2", "destination"]);

        assert_eq!(
            remove_stop(&stops, "nope"),
            Err(StopSequenceError::UnknownStop("nope".to_string()))
        );
    }

    #[test]
    fn test_waypoint_with_taken_id_gets_fresh_one() {
        let mut stops = placeholders();
        for (id, address) in [("a", "A"), ("b", "B")] {
            stops = add_stop(&stops, located(id, address));
        }
        let stops = add_stop(&stops, located("origin", "Second depot"));
        let stops = add_stop(&stops, located("destination", "Second customer"));
        let stops = add_stop(&stops, located("waypoint-1", "Third customer"));
        assert_eq!(
            ids(&stops),
            vec!["origin", "waypoint-1", "waypoint-2", "waypoint-3", "destination"]
        );
        assert_eq!(stops[1].address, "Second depot");

        let stops = remove_stop(&stops, "waypoint-1").unwrap();
        assert_eq!(ids(&stops), vec!["origin", "waypoint-2", "waypoint-3", "destination"]);
        assert_eq!(stops[0].address, "A");
    }

    #[test]
    fn test_duplicate_waypoint_id_is_renamed() {
        let mut stops = placeholders();
        for (id, address) in [("a", "A"), ("b", "B"), ("w1", "W1"), ("w1", "W1 again")] {
            stops = add_stop(&stops, located(id, address));
        }
        assert_eq!(ids(&stops), vec!["origin", "w1", "waypoint-1", "destination"]);
    }
}
