//! Planificación de rutas de reparto
//!
//! Construcción de rutas con origen, destino y puntos intermedios,
//! validación, estimación de costes y persistencia, expuestas como API
//! HTTP sobre Axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
