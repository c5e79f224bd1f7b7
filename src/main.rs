//! MindEase timer server
//!
//! This is the main entry point for the mindease application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use mindease::{
    api::create_router,
    config::Config,
    state::AppState,
    timer::SystemClock,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("mindease={},tower_http=info", config.log_level()))
        .init();

    info!("Starting mindease server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, focus={}min, break={}min, store={}",
        config.host,
        config.port,
        config.focus_minutes,
        config.break_minutes,
        if config.ephemeral {
            "memory".to_string()
        } else {
            config.data_dir.display().to_string()
        }
    );

    // Mount both timers, restoring persisted sessions
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.preferences(),
        config.store(),
        Arc::new(SystemClock),
    ));

    // Tick running timers until shutdown
    let drivers = state.spawn_countdown_drivers();

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timers              - Both timers");
    info!("  GET  /timers/:kind        - One timer (focus|break)");
    info!("  POST /timers/:kind/start  - Start a session");
    info!("  POST /timers/:kind/stop   - Cancel a session");
    info!("  GET  /preferences         - Current durations");
    info!("  PUT  /preferences         - Change durations");
    info!("  GET  /format?seconds=N    - Render MM:SS");
    info!("  GET  /status              - Server and timer status");
    info!("  GET  /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    drop(drivers);
    info!("Server shutdown complete");
    Ok(())
}
