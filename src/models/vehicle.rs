//! Modelo de Vehicle
//!
//! Vehículos de la flota. El tipo de vehículo determina el multiplicador
//! de consumo que aplica el estimador de costes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eficiencia por defecto cuando la tabla no guarda fuel_efficiency
pub const DEFAULT_FUEL_EFFICIENCY: f64 = 0.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub license_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub capacity: Option<f64>,
    pub status: Option<String>,
    pub fuel_efficiency: f64,
}
