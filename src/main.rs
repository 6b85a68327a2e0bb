// src/main.rs

use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_balance::{
    api::create_router, blockchain::client::ChainClients, config::Config, AppState,
};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) -> anyhow::Result<()> {
    let app = Router::new()
        .nest("/api", create_router())
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_balance=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    // Connect timeout only; request deadlines are enforced per endpoint.
    let http = match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Failed to build HTTP client: {}", e);
            return;
        }
    };

    let app_state = match AppState::new(config, ChainClients::live(http)) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to initialize services: {:#}", e);
            return;
        }
    };

    info!(
        "Serving {} networks, RPC overrides at {}",
        app_state.registry.keys().len(),
        app_state.overrides.path().display()
    );

    if let Err(e) = run_http_server(app_state).await {
        error!("❌ HTTP server stopped: {:#}", e);
    }
}
