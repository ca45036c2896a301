//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio de rutas, paradas,
//! conductores y vehículos.

pub mod driver;
pub mod route;
pub mod stop;
pub mod vehicle;

pub use driver::Driver;
pub use route::{
    NewRoute, OptimizationPriority, Route, RouteConstraints, RouteFilter, RouteStatus, TimeWindow,
};
pub use stop::{Stop, StopType};
pub use vehicle::Vehicle;
