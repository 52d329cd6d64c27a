//! Zaintza Server - care-services marketplace backend

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zaintza_adapters::AppConfig;
use zaintza_api::create_router;
use zaintza_server::bootstrap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("starting zaintza server");

    let repos = match &config.database.url {
        Some(url) => {
            info!("persistence: PostgreSQL");
            bootstrap::postgres_repositories(url, config.database.max_connections).await?
        }
        None => {
            info!("persistence: in-memory");
            bootstrap::in_memory_repositories()
        }
    };

    let state = bootstrap::build_state(&repos);
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
