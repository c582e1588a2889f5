use enquiry_desk::bootstrap;
use enquiry_desk::config::Config;
use enquiry_desk::infrastructure::http::router::build_router;
use enquiry_desk::infrastructure::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    observability::init(&config)?;
    tracing::info!("Configuration loaded");

    let gateway = bootstrap::prepare_store(&config).await?;
    let state = bootstrap::build_app_state(gateway);

    let app = build_router(state);

    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
