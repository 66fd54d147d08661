use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ultima_milla_manager::{config::EnvironmentConfig, create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚚 PRODE Última Milla Manager");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    let addr = config.server_url();

    let app_state = AppState::new(config);
    if let Err(e) = app_state.data.initialize().await {
        error!("❌ Error preparando el directorio de datos: {}", e);
        return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
    }

    if app_state.config.is_development() && app_state.config.cors_origins.is_empty() {
        info!("⚠️ CORS permisivo (sin CORS_ORIGINS)");
    }

    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio y de los ficheros");
    info!("🗂️ Entidades (empleados, vehiculos, servicios, ausencias, epis, mantenimiento, documentacion):");
    info!("   GET    /api/<entidad> - Listar");
    info!("   POST   /api/<entidad> - Crear");
    info!("   GET    /api/<entidad>/:id - Obtener");
    info!("   PUT    /api/<entidad>/:id - Actualizar");
    info!("   DELETE /api/<entidad>/:id - Enviar a la papelera");
    info!("📎 Documentos:");
    info!("   POST /api/vehiculos/:id/documentos - Adjuntar a vehículo");
    info!("   POST /api/servicios/:id/documentos - Adjuntar a servicio");
    info!("   POST /api/documentacion/subir - Subir documento");
    info!("🗑️ Papelera:");
    info!("   GET    /api/papelera - Listar (?tipo=&buscar=)");
    info!("   GET    /api/papelera/:trash_id - Obtener entrada");
    info!("   POST   /api/papelera/:trash_id/restaurar - Restaurar");
    info!("   DELETE /api/papelera/:trash_id - Purgar (admin)");
    info!("   DELETE /api/papelera?confirmar=true - Vaciar (admin)");
    info!("📊 GET /api/dashboard - Panel general");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
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
