//! Services module
//!
//! Este módulo contiene la lógica de negocio: validación y secuenciación de
//! paradas, estimación de costes, direcciones y persistencia de rutas.

pub mod cost_estimator;
pub mod directions_service;
pub mod notifications;
pub mod route_draft;
pub mod route_planner;
pub mod route_service;
pub mod route_validation;
pub mod stop_sequencer;

pub use cost_estimator::{estimate_cost, estimate_cost_breakdown, CostBreakdown, VehicleType};
pub use directions_service::{
    Directions, DirectionsOptions, DirectionsProvider, HaversineDirections, MapboxDirectionsService,
};
pub use notifications::{LogNotifier, Notification, NotificationBuffer, Notifier};
pub use route_draft::RouteDraft;
pub use route_planner::{PlannedRoute, RoutePlanner};
pub use route_service::RouteService;
pub use route_validation::{check_route, validate_route, RouteValidation, RouteValidationError};
