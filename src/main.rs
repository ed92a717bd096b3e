mod auth;
mod booking;
mod config;

mod db;
mod error;
mod extract;
mod models;
mod routes;
mod store;

use crate::{config::Config, models::AppState, store::PgStore};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    if let Err(e) = run().await {
        // startup failures are fatal: log, then exit non-zero via main's Err
        tracing::error!(error = %format!("{e:#}"), "server failed");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cfg = Config::from_env()?;
    let pool = db::connect_pg(&cfg.database_url, cfg.db_max_connections).await?;
    if cfg.run_migrations {
        db::run_migrations(&pool).await?;
    }

    let state = AppState::new(PgStore::new(pool));

    // Browser frontends call the API cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
