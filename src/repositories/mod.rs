//! Repositorios
//!
//! Acceso a la persistencia de rutas, paradas, conductores y vehículos.

pub mod memory_route_store;
pub mod route_repository;
pub mod rows;

pub use memory_route_store::InMemoryRouteStore;
pub use route_repository::{PgRouteStore, RouteStore};
