use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tally_core::TokenConfig;
use tally_core::password;
use tally_db::{Database, DatabaseConfig};
use tally_server::routes;
use tally_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tally=info".parse()?))
        .with_target(false)
        .init();

    let secret = std::env::var("TALLY_JWT_SECRET").expect("TALLY_JWT_SECRET must be set");
    let port = std::env::var("TALLY_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    db.migrate().await?;
    seed_admin(&db).await?;

    let state = Arc::new(AppState {
        db,
        tokens: TokenConfig::new(secret),
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Create the initial admin account when `TALLY_ADMIN_EMAIL` and
/// `TALLY_ADMIN_PASSWORD` are both set. A no-op when the email is taken,
/// so restarts never clobber an existing account.
async fn seed_admin(db: &Database) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("TALLY_ADMIN_EMAIL"),
        std::env::var("TALLY_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let hash = password::hash(&password)?;
    if db.user_repo().ensure_admin("Administrator", &email, &hash).await? {
        tracing::info!("Seeded initial admin user {email}");
    }
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Shutdown signal received");
}
