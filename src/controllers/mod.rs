pub mod fleet_controller;
pub mod route_controller;
