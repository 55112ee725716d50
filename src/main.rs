use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_dispatch::config::environment::EnvironmentConfig;
use fleet_dispatch::database::create_pool;
use fleet_dispatch::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use fleet_dispatch::repositories::{FleetStore, MemoryFleetStore, PgFleetStore};
use fleet_dispatch::routes;
use fleet_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = EnvironmentConfig::default();

    info!("🚛 Fleet Dispatch - Motor de despacho de flota");
    info!("==============================================");

    // Backend de persistencia: PostgreSQL si hay DATABASE_URL, memoria si no
    let store: Arc<dyn FleetStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = match create_pool(Some(url)).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            info!("✅ PostgreSQL conectado exitosamente");
            Arc::new(PgFleetStore::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no configurada - usando store en memoria (los datos no persisten)");
            Arc::new(MemoryFleetStore::new())
        }
    };

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(store, config.clone());

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/trips", routes::trip_routes::create_trip_router())
        .nest(
            "/api/maintenance",
            routes::maintenance_routes::create_maintenance_router(),
        )
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/drivers", routes::driver_routes::create_driver_router())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🧾 Endpoints - Despacho:");
    info!("   POST /api/trips/validate - Validar despacho (sin efectos)");
    info!("   POST /api/trips - Despachar viaje");
    info!("   GET  /api/trips - Listar viajes");
    info!("   GET  /api/trips/:id - Obtener viaje");
    info!("   PATCH /api/trips/:id/start - Arrancar viaje");
    info!("   PATCH /api/trips/:id/complete - Completar viaje");
    info!("   PATCH /api/trips/:id/cancel - Cancelar viaje");
    info!("🔧 Endpoints - Mantenimiento:");
    info!("   POST /api/maintenance - Programar mantenimiento");
    info!("   GET  /api/maintenance - Listar mantenimientos");
    info!("   GET  /api/maintenance/:id - Obtener mantenimiento");
    info!("   PATCH /api/maintenance/:id/start - Arrancar mantenimiento");
    info!("   PATCH /api/maintenance/:id/complete - Completar mantenimiento");
    info!("   PATCH /api/maintenance/:id/cancel - Cancelar mantenimiento");
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicles - Registrar vehículo");
    info!("   GET  /api/vehicles - Listar vehículos");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("   PUT  /api/vehicles/:id - Actualizar vehículo");
    info!("   GET  /api/vehicles/:id/compliance - Cumplimiento documental");
    info!("👤 Endpoints - Driver:");
    info!("   POST /api/drivers - Registrar conductor");
    info!("   GET  /api/drivers - Listar conductores");
    info!("   GET  /api/drivers/:id - Obtener conductor");
    info!("   PUT  /api/drivers/:id - Actualizar conductor");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor detenido");
    Ok(())
}

async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet_dispatch",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Error instalando handler de Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("❌ Error instalando handler de SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Señal de apagado recibida, cerrando servidor...");
}
