//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, SmtpMailer},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState, tokens::TokenIssuer},
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter
        .run_migrations()
        .await
        .map_err(|e| ApiError::Internal(format!("Migration failed: {}", e)))?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Mail Adapter and Token Issuer ---
    let mailer = Arc::new(SmtpMailer::from_config(&config)?);
    let tokens = TokenIssuer::from_config(&config);

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState {
        store: db_adapter,
        mailer,
        tokens,
        config: config.clone(),
    });

    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
