//! Configuración de variables de entorno
//!
//! Lee el entorno una sola vez al arrancar. Los valores obligatorios que
//! faltan o no se pueden parsear devuelven error en vez de abortar.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub mapbox_token: Option<String>,
    pub mapbox_base_url: String,
    pub directions_timeout: Duration,
    /// Velocidad media del cálculo sin red, en km/h
    pub fallback_speed_kmh: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: vec![],
            mapbox_token: None,
            mapbox_base_url: DEFAULT_MAPBOX_BASE_URL.to_string(),
            directions_timeout: Duration::from_secs(10),
            fallback_speed_kmh: 50.0,
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} must be a valid number, got '{}'", name, raw))),
        None => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl EnvironmentConfig {
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let fallback_speed_kmh = parse_var("FALLBACK_SPEED_KMH", defaults.fallback_speed_kmh)?;
        if fallback_speed_kmh.is_nan() || fallback_speed_kmh <= 0.0 {
            return Err(AppError::Configuration(
                "FALLBACK_SPEED_KMH must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: var("HOST").unwrap_or(defaults.host),
            cors_origins: var("CORS_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or_default(),
            mapbox_token: var("MAPBOX_TOKEN"),
            mapbox_base_url: var("MAPBOX_BASE_URL").unwrap_or(defaults.mapbox_base_url),
            directions_timeout: Duration::from_secs(parse_var("DIRECTIONS_TIMEOUT_SECS", 10u64)?),
            fallback_speed_kmh,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://localhost:5173, https://app.example.com,,"),
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert!(config.mapbox_token.is_none());
    }
}
