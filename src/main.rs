use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use route_planning::config::database::DatabaseConfig;
use route_planning::config::environment::EnvironmentConfig;
use route_planning::database::DatabaseConnection;
use route_planning::repositories::{InMemoryRouteStore, PgRouteStore, RouteStore};
use route_planning::routes::create_app;
use route_planning::services::directions_service::{
    DirectionsProvider, HaversineDirections, MapboxDirectionsService,
};
use route_planning::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Route Planning API");
    info!("=====================");

    let config = EnvironmentConfig::from_env()?;

    // Almacén de rutas
    let store: Arc<dyn RouteStore> = match DatabaseConfig::from_env()? {
        Some(db_config) => {
            let connection = match DatabaseConnection::new(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            Arc::new(PgRouteStore::new(connection.pool()))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida: usando almacén en memoria, los datos no persisten");
            Arc::new(InMemoryRouteStore::new())
        }
    };

    // Proveedor de direcciones
    let directions: Arc<dyn DirectionsProvider> = match &config.mapbox_token {
        Some(token) => {
            info!("🗺️ Direcciones con Mapbox");
            Arc::new(MapboxDirectionsService::new(
                token.clone(),
                config.mapbox_base_url.clone(),
                config.directions_timeout,
            )?)
        }
        None => {
            warn!(
                "⚠️ MAPBOX_TOKEN no definido: distancias en línea recta a {} km/h",
                config.fallback_speed_kmh
            );
            Arc::new(HaversineDirections::new(config.fallback_speed_kmh))
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(config, store, directions));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🛣️ Rutas:");
    info!("   POST /api/routes/stops - Añadir parada");
    info!("   POST /api/routes/stops/remove - Quitar parada");
    info!("   POST /api/routes/validate - Validar ruta");
    info!("   POST /api/routes/estimate-cost - Estimar coste");
    info!("   POST /api/routes/plan - Planificar ruta");
    info!("   POST /api/routes - Guardar ruta");
    info!("   GET  /api/routes - Listar rutas");
    info!("🚗 Flota:");
    info!("   GET  /api/drivers - Listar conductores");
    info!("   GET  /api/vehicles - Listar vehículos");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
