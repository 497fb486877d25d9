use anyhow::Result;
use supply_chain_dashboard::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;
    let addr = config.bind_addr;
    tracing::info!(
        max_file_size = config.max_file_size,
        session_idle_secs = config.session_idle_secs,
        max_sessions = config.max_sessions,
        "Configuration loaded"
    );

    let app = app(config);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
