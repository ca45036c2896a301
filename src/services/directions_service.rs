//! Proveedores de direcciones
//!
//! A partir de una lista ordenada de coordenadas devuelven distancia (metros),
//! duración (segundos) y la geometría de la ruta. El núcleo los trata como
//! una caja negra.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::route::{OptimizationPriority, RouteConstraints};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_coordinates;

/// Límite de coordenadas por petición de Mapbox Directions
pub const MAX_COORDINATES: usize = 25;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionsOptions {
    pub priority: OptimizationPriority,
    pub constraints: RouteConstraints,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Directions {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// `coordinates` en orden de visita, como pares `(lat, lng)`
    async fn directions(
        &self,
        coordinates: &[(f64, f64)],
        options: &DirectionsOptions,
    ) -> AppResult<Directions>;
}

fn check_coordinates(coordinates: &[(f64, f64)]) -> AppResult<()> {
    if coordinates.len() < 2 {
        return Err(AppError::BadRequest(
            "At least two coordinates are required for directions".to_string(),
        ));
    }
    if coordinates.len() > MAX_COORDINATES {
        return Err(AppError::BadRequest(format!(
            "Directions support at most {} stops",
            MAX_COORDINATES
        )));
    }
    for (lat, lng) in coordinates {
        validate_coordinates(*lat, *lng).map_err(|e| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("coordinates", e);
            AppError::Validation(errors)
        })?;
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct MapboxDirectionsResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<MapboxRoute>,
}

#[derive(Debug, Clone, Deserialize)]
struct MapboxRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<serde_json::Value>,
}

/// Elige la alternativa según la prioridad: la más rápida, la más corta o la
/// primera que propone el proveedor
fn pick_route(routes: &[MapboxRoute], priority: OptimizationPriority) -> Option<&MapboxRoute> {
    match priority {
        OptimizationPriority::Fastest => routes
            .iter()
            .min_by(|a, b| a.duration.total_cmp(&b.duration)),
        OptimizationPriority::Shortest => routes
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance)),
        OptimizationPriority::Balanced => routes.first(),
    }
}

/// Cliente de Mapbox Directions API v5
pub struct MapboxDirectionsService {
    mapbox_token: String,
    base_url: String,
    client: reqwest::Client,
}

impl MapboxDirectionsService {
    pub fn new(mapbox_token: String, base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            mapbox_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn profile(options: &DirectionsOptions) -> &'static str {
        if options.constraints.use_real_time_traffic {
            "driving-traffic"
        } else {
            "driving"
        }
    }

    fn query_params(&self, coordinates: &[(f64, f64)], options: &DirectionsOptions) -> Vec<(&'static str, String)> {
        let mut exclude = Vec::new();
        if options.constraints.avoid_tolls {
            exclude.push("toll");
        }
        if options.constraints.avoid_highways {
            exclude.push("motorway");
        }

        // Mapbox solo ofrece alternativas entre dos puntos
        let alternatives = coordinates.len() == 2 && options.priority != OptimizationPriority::Balanced;

        let mut params = vec![
            ("geometries", "geojson".to_string()),
            ("overview", "full".to_string()),
            ("alternatives", alternatives.to_string()),
            ("continue_straight", (!options.constraints.allow_u_turns).to_string()),
            ("access_token", self.mapbox_token.clone()),
        ];
        if !exclude.is_empty() {
            params.push(("exclude", exclude.join(",")));
        }
        params
    }
}

#[async_trait]
impl DirectionsProvider for MapboxDirectionsService {
    async fn directions(
        &self,
        coordinates: &[(f64, f64)],
        options: &DirectionsOptions,
    ) -> AppResult<Directions> {
        check_coordinates(coordinates)?;

        // Mapbox espera lng,lat
        let path = coordinates
            .iter()
            .map(|(lat, lng)| format!("{},{}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/directions/v5/mapbox/{}/{}",
            self.base_url,
            Self::profile(options),
            path
        );

        log::info!("🗺️ Pidiendo direcciones a Mapbox para {} puntos", coordinates.len());

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(coordinates, options))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Directions request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Mapbox respondió {}: {}", status, error_text);
            return Err(AppError::ExternalApi(format!("Directions failed with status {}", status)));
        }

        let body: MapboxDirectionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse directions response: {}", e)))?;

        if body.code != "Ok" {
            return Err(AppError::ExternalApi(format!(
                "Directions error {}: {}",
                body.code,
                body.message.unwrap_or_default()
            )));
        }

        let route = pick_route(&body.routes, options.priority)
            .ok_or_else(|| AppError::ExternalApi("No route found between the stops".to_string()))?;

        log::info!(
            "✅ Ruta de Mapbox: {:.0} m, {:.0} s ({} alternativas)",
            route.distance,
            route.duration,
            body.routes.len()
        );

        Ok(Directions {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry.clone(),
        })
    }
}

/// Estimación sin red: tramos en línea recta a una velocidad media fija
#[derive(Debug, Clone)]
pub struct HaversineDirections {
    /// Velocidad media asumida en km/h
    pub speed_kmh: f64,
}

impl Default for HaversineDirections {
    fn default() -> Self {
        Self { speed_kmh: 50.0 }
    }
}

impl HaversineDirections {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);

        EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
    }
}

#[async_trait]
impl DirectionsProvider for HaversineDirections {
    async fn directions(
        &self,
        coordinates: &[(f64, f64)],
        _options: &DirectionsOptions,
    ) -> AppResult<Directions> {
        check_coordinates(coordinates)?;
        if self.speed_kmh <= 0.0 {
            return Err(AppError::Configuration("Fallback speed must be positive".to_string()));
        }

        let km: f64 = coordinates
            .windows(2)
            .map(|leg| Self::haversine_km(leg[0], leg[1]))
            .sum();

        let line: Vec<[f64; 2]> = coordinates.iter().map(|(lat, lng)| [*lng, *lat]).collect();

        Ok(Directions {
            distance_meters: km * 1000.0,
            duration_seconds: km / self.speed_kmh * 3600.0,
            geometry: Some(serde_json::json!({ "type": "LineString", "coordinates": line })),
        })
    }
}
