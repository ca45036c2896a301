//! Validación estructural de rutas
//!
//! Se ejecuta justo antes de guardar u optimizar. Las comprobaciones se
//! evalúan en orden y solo se informa el primer fallo.

use serde::Serialize;
use thiserror::Error;

use crate::models::stop::{Stop, StopType};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteValidationError {
    #[error("A route must have at least two stops (origin and destination)")]
    InsufficientStops,

    #[error("At least one stop must have an address and coordinates")]
    NoGeolocatedStop,

    #[error("The origin stop must have valid coordinates")]
    OriginNotGeolocated,

    #[error("The destination stop must have valid coordinates")]
    DestinationNotGeolocated,

    #[error("Please enter a route name")]
    MissingName,
}

impl RouteValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            RouteValidationError::InsufficientStops => "INSUFFICIENT_STOPS",
            RouteValidationError::NoGeolocatedStop => "NO_GEOLOCATED_STOP",
            RouteValidationError::OriginNotGeolocated => "ORIGIN_NOT_GEOLOCATED",
            RouteValidationError::DestinationNotGeolocated => "DESTINATION_NOT_GEOLOCATED",
            RouteValidationError::MissingName => "MISSING_NAME",
        }
    }
}

/// Resultado de validación tal como lo consume la interfaz
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl From<Result<(), RouteValidationError>> for RouteValidation {
    fn from(result: Result<(), RouteValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                message: None,
                code: None,
            },
            Err(e) => Self {
                is_valid: false,
                message: Some(e.to_string()),
                code: Some(e.code()),
            },
        }
    }
}

/// Comprueba la ruta y devuelve el primer error encontrado
pub fn check_route(stops: &[Stop], name: Option<&str>) -> Result<(), RouteValidationError> {
    if stops.len() < 2 {
        return Err(RouteValidationError::InsufficientStops);
    }

    if !stops.iter().any(|s| s.has_address() && s.is_geolocated()) {
        return Err(RouteValidationError::NoGeolocatedStop);
    }

    // Origen y destino se localizan por tipo, no por posición
    if stops
        .iter()
        .any(|s| s.stop_type == StopType::Origin && !s.is_geolocated())
    {
        return Err(RouteValidationError::OriginNotGeolocated);
    }

    if stops
        .iter()
        .any(|s| s.stop_type == StopType::Destination && !s.is_geolocated())
    {
        return Err(RouteValidationError::DestinationNotGeolocated);
    }

    if name.map_or(true, |n| n.trim().is_empty()) {
        return Err(RouteValidationError::MissingName);
    }

    Ok(())
}

/// Variante con la forma `{ isValid, message }` que espera la interfaz
pub fn validate_route(stops: &[Stop], name: Option<&str>) -> RouteValidation {
    check_route(stops, name).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nyc() -> Stop {
        Stop::new("origin", "NYC", StopType::Origin).with_coordinates(40.7, -74.0)
    }

    fn la() -> Stop {
        Stop::new("destination", "LA", StopType::Destination).with_coordinates(34.0, -118.2)
    }

    #[test]
    fn test_cross_country_route_is_valid() {
        let result = validate_route(&[nyc(), la()], Some("Cross Country"));
        assert!(result.is_valid);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_fewer_than_two_stops() {
        for stops in [vec![], vec![nyc()]] {
            let result = validate_route(&stops, Some("Route"));
            assert!(!result.is_valid);
            assert_eq!(
                result.message.as_deref(),
                Some("A route must have at least two stops (origin and destination)")
            );
        }
    }

    #[test]
    fn test_no_stop_with_address_and_coordinates() {
        // coordenadas sin dirección y dirección sin coordenadas
        let origin = Stop::new("origin", "", StopType::Origin).with_coordinates(40.7, -74.0);
        let destination = Stop::new("destination", "LA", StopType::Destination);

        assert_eq!(
            check_route(&[origin, destination], Some("Route")),
            Err(RouteValidationError::NoGeolocatedStop)
        );
    }

    #[test]
    fn test_origin_and_destination_need_coordinates() {
        let bare_origin = Stop::new("origin", "NYC", StopType::Origin);
        assert_eq!(
            check_route(&[bare_origin, la()], Some("Route")),
            Err(RouteValidationError::OriginNotGeolocated)
        );

        let mut half_destination = Stop::new("destination", "LA", StopType::Destination);
        half_destination.latitude = Some(34.0);
        assert_eq!(
            check_route(&[nyc(), half_destination], Some("Route")),
            Err(RouteValidationError::DestinationNotGeolocated)
        );
    }

    #[test]
    fn test_origin_found_by_type_not_position() {
        let waypoint = Stop::new("w1", "Chicago", StopType::Waypoint).with_coordinates(41.8, -87.6);
        let bare_origin = Stop::new("origin", "NYC", StopType::Origin);

        assert_eq!(
            check_route(&[waypoint, la(), bare_origin], Some("Route")),
            Err(RouteValidationError::OriginNotGeolocated)
        );
    }

    #[test]
    fn test_name_checked_last() {
        assert_eq!(check_route(&[nyc(), la()], None), Err(RouteValidationError::MissingName));
        assert_eq!(check_route(&[nyc(), la()], Some("   ")), Err(RouteValidationError::MissingName));

        // con menos de dos paradas gana el error de paradas
        assert_eq!(check_route(&[nyc()], None), Err(RouteValidationError::InsufficientStops));
    }

    #[test]
    fn test_validation_serializes_for_ui() {
        let json = serde_json::to_value(validate_route(&[nyc(), la()], None)).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["message"], "Please enter a route name");
        assert_eq!(json["code"], "MISSING_NAME");
    }
}
