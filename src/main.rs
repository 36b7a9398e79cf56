use page_digest::{api::routes::create_router, config::Config, logger, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    logger::init(&config.log_level)?;
    info!(?config, "configuration loaded");

    // Create application state
    let app_state = AppState::from_config(&config)?;
    info!(model = %app_state.registry.active_label(), "default model selected");

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(config.server_addr).await?;

    // Start the server
    info!(addr = %config.server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
