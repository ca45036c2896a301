//! Modelo de Stop
//!
//! Una parada dentro de una ruta: origen, destino o punto intermedio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Id reservado para el hueco de origen
pub const ORIGIN_STOP_ID: &str = "origin";
/// Id reservado para el hueco de destino
pub const DESTINATION_STOP_ID: &str = "destination";

/// Rol de la parada dentro de la ruta - mapea a la columna stop_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StopType {
    Origin,
    Destination,
    Waypoint,
}

impl StopType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopType::Origin => "origin",
            StopType::Destination => "destination",
            StopType::Waypoint => "waypoint",
        }
    }
}

impl fmt::Display for StopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(StopType::Origin),
            "destination" => Ok(StopType::Destination),
            "waypoint" => Ok(StopType::Waypoint),
            other => Err(format!("unknown stop type '{}'", other)),
        }
    }
}

/// Parada de una ruta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[validate(length(min = 1, max = 100))]
    pub id: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,
    #[serde(rename = "type")]
    pub stop_type: StopType,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub departure_time: Option<DateTime<Utc>>,
}

impl Stop {
    pub fn new(id: impl Into<String>, address: impl Into<String>, stop_type: StopType) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            stop_type,
            latitude: None,
            longitude: None,
            arrival_time: None,
            departure_time: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Hueco vacío de origen con el que arranca toda ruta
    pub fn origin_placeholder() -> Self {
        Self::new(ORIGIN_STOP_ID, "", StopType::Origin)
    }

    /// Hueco vacío de destino con el que arranca toda ruta
    pub fn destination_placeholder() -> Self {
        Self::new(DESTINATION_STOP_ID, "", StopType::Destination)
    }

    pub fn is_geolocated(&self) -> bool {
        is_geolocated(self)
    }

    /// Cualquier texto cuenta como dirección, también solo espacios
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// `(lat, lng)` solo cuando la parada está geolocalizada
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }

    /// Las paradas de origen y destino no se pueden quitar individualmente
    pub fn is_protected(&self) -> bool {
        self.id == ORIGIN_STOP_ID || self.id == DESTINATION_STOP_ID
    }
}

/// Una parada sirve para calcular distancias solo si tiene latitud y longitud finitas
pub fn is_geolocated(stop: &Stop) -> bool {
    stop.coordinates().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinate_ranges() {
        assert!(Stop::origin_placeholder().validate().is_ok());
        assert!(Stop::new("a", "Depot", StopType::Waypoint)
            .with_coordinates(48.85, 2.35)
            .validate()
            .is_ok());

        let errors = Stop::new("a", "Depot", StopType::Waypoint)
            .with_coordinates(91.0, 200.0)
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("longitude"));
    }

    #[test]
    fn test_geolocated_requires_both_coordinates() {
        let mut stop = Stop::new("a", "Depot", StopType::Waypoint);
        assert!(!is_geolocated(&stop));

        stop.latitude = Some(40.7);
        assert!(!is_geolocated(&stop));

        stop.longitude = Some(-74.0);
        assert!(is_geolocated(&stop));
    }

    #[test]
    fn test_non_finite_coordinates_are_not_geolocated() {
        let stop = Stop::new("a", "Depot", StopType::Origin).with_coordinates(f64::NAN, 2.35);
        assert!(!stop.is_geolocated());

        let stop = Stop::new("b", "Depot", StopType::Origin).with_coordinates(48.85, f64::INFINITY);
        assert!(!stop.is_geolocated());
    }

    #[test]
    fn test_has_address_is_a_presence_check() {
        assert!(!Stop::new("a", "", StopType::Waypoint).has_address());
        assert!(Stop::new("a", "  ", StopType::Waypoint).has_address());
        assert!(Stop::new("a", "Depot", StopType::Waypoint).has_address());
    }

    #[test]
    fn test_stop_json_shape() {
        let json = r#"{"id":"s1","address":"NYC","type":"origin","latitude":40.7,"longitude":-74.0}"#;
        let stop: Stop = serde_json::from_str(json).unwrap();
        assert_eq!(stop.stop_type, StopType::Origin);
        assert_eq!(stop.coordinates(), Some((40.7, -74.0)));
        assert!(stop.arrival_time.is_none());
    }

    #[test]
    fn test_stop_type_parsing() {
        assert_eq!("waypoint".parse::<StopType>(), Ok(StopType::Waypoint));
        assert!("depot".parse::<StopType>().is_err());
    }
}
