use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use webhook_inspector::{
    config::Config, routes, store, utils::logging::init_tracing, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);

    let store = store::connect(&config).await?;
    info!(
        capture_path = %config.capture_path,
        model = %config.generation_model,
        "starting webhook inspector"
    );
    if config.generation_api_key.is_empty() {
        tracing::warn!("GENERATION_API_KEY is empty, handler generation requests will fail");
    }

    let addr: SocketAddr = config.server_address.parse()?;
    let app_state = AppState::with_remote_generator(config, store)?;
    let app = routes::build_router(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
