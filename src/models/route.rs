//! Modelo de Route
//!
//! Este módulo contiene el struct Route, la ruta todavía no persistida
//! (`NewRoute`) y los filtros de búsqueda.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::driver::Driver;
use super::stop::{Stop, StopType};
use super::vehicle::Vehicle;

/// Estado de la ruta - mapea a la columna routes.status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Planned => "planned",
            RouteStatus::InProgress => "in_progress",
            RouteStatus::Completed => "completed",
            RouteStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(RouteStatus::Planned),
            "in_progress" => Ok(RouteStatus::InProgress),
            "completed" => Ok(RouteStatus::Completed),
            "cancelled" => Ok(RouteStatus::Cancelled),
            other => Err(format!("unknown route status '{}'", other)),
        }
    }
}

/// Preferencia de optimización que consume el proveedor de direcciones
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationPriority {
    Fastest,
    Shortest,
    #[default]
    Balanced,
}

impl OptimizationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationPriority::Fastest => "fastest",
            OptimizationPriority::Shortest => "shortest",
            OptimizationPriority::Balanced => "balanced",
        }
    }
}

impl FromStr for OptimizationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fastest" => Ok(OptimizationPriority::Fastest),
            "shortest" => Ok(OptimizationPriority::Shortest),
            "balanced" => Ok(OptimizationPriority::Balanced),
            other => Err(format!("unknown optimization priority '{}'", other)),
        }
    }
}

/// Restricciones de ruteo - se guardan como jsonb en routes.constraints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteConstraints {
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
    pub use_real_time_traffic: bool,
    #[serde(rename = "allowUTurns")]
    pub allow_u_turns: bool,
}

impl Default for RouteConstraints {
    fn default() -> Self {
        Self {
            avoid_tolls: false,
            avoid_highways: false,
            use_real_time_traffic: true,
            allow_u_turns: true,
        }
    }
}

/// Ventana horaria opcional de la ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

/// Ruta construida en el cliente, lista para validar y guardar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRoute {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time_window: TimeWindow,
    #[validate]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub optimization_priority: OptimizationPriority,
    #[serde(default)]
    pub constraints: RouteConstraints,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub duration: Option<f64>,
    #[serde(default)]
    pub estimated_cost: Option<Decimal>,
    #[serde(default)]
    pub status: RouteStatus,
}

/// Route persistida, con ids y timestamps asignados por la base de datos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time_window: TimeWindow,
    pub stops: Vec<Stop>,
    pub driver: Option<Driver>,
    pub vehicle: Option<Vehicle>,
    pub optimization_priority: OptimizationPriority,
    pub constraints: RouteConstraints,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub estimated_cost: Option<Decimal>,
    pub status: RouteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    pub fn origin(&self) -> Option<&Stop> {
        self.stops.iter().find(|s| s.stop_type == StopType::Origin)
    }

    pub fn destination(&self) -> Option<&Stop> {
        self.stops.iter().find(|s| s.stop_type == StopType::Destination)
    }
}

/// Filtros para búsqueda de rutas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteFilter {
    /// Subcadena del nombre o apellido del conductor, sin distinguir mayúsculas
    pub driver: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<RouteStatus>,
}

impl RouteFilter {
    pub fn is_empty(&self) -> bool {
        self.driver.as_deref().map_or(true, |d| d.trim().is_empty())
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.status.is_none()
    }

    /// Aplica todos los criterios sobre una ruta ya hidratada
    pub fn matches(&self, route: &Route) -> bool {
        if let Some(status) = self.status {
            if route.status != status {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = route.date else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        if let Some(needle) = self.driver.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            let needle = needle.to_lowercase();
            return route.driver.as_ref().is_some_and(|driver| {
                driver.first_name.to_lowercase().contains(&needle)
                    || driver.last_name.to_lowercase().contains(&needle)
            });
        }

        true
    }
}
