//! Modelo de Driver
//!
//! Datos de referencia de conductores asignables a una ruta.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Jornada por defecto cuando la tabla no guarda max_hours
pub const DEFAULT_MAX_HOURS: i32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub max_hours: i32,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
