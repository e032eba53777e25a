mod api;
mod config;
mod db;
mod distribution;
mod error;
mod tally;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::ServerConfig;
use error::ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "electoral_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let db = db::connect(&config.database_url, config.max_connections).await?;
    tracing::info!("Database ready at {}", config.database_url);

    let state = Arc::new(AppState::new(db));

    let app = api::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Electoral admin server starting on http://{}", config.bind_addr);
    tracing::info!("");
    tracing::info!("Table endpoints:");
    tracing::info!("  POST /mesas/crear-distribuir - Allocate tables and distribute a roster");
    tracing::info!("  POST /mesas/crear-mesas      - Pre-provision empty tables at a precinct");
    tracing::info!("  POST /mesas/distribuir       - Distribute a roster over a section");
    tracing::info!("  POST /mesas/asignar-eleccion - Bind a section's tables to an election");
    tracing::info!("Tallies under /votos/...");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
