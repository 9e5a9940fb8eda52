use anyhow::Result;

use localpro_backend::{app, auth, config, db, logging};
use localpro_backend::services::{Mailer, NotificationRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting LocalPro backend"
    );

    // Create database pool and apply migrations
    let pool = db::create_pool(&settings).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Identity verifier for bearer tokens
    let http_client = reqwest::Client::new();
    let identity = auth::IdentityVerifier::new(
        http_client,
        settings.auth_jwks_url.clone(),
        settings.auth_issuer.clone(),
        settings.auth_audience.clone(),
        settings.jwks_cache_ttl_seconds,
    );

    // Optionally warm the JWKS cache
    if let Err(e) = identity.warm_cache().await {
        tracing::warn!(error = %e, "Failed to warm JWKS cache - will fetch on first request");
    }

    // In-process notification fan-out and transactional email
    let registry = NotificationRegistry::new();
    let mailer = Mailer::from_settings(&settings)?;

    // Create application state
    let state = app::AppState::new(pool, settings.clone(), identity, registry, mailer);

    // Build application
    let app = app::create_app(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    state.registry.clear();

    Ok(())
}
