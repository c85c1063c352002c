//! HTTP server initialization.
//!
//! [`setup_shared_state`] wires the database, generator, translator, and
//! identity provider together; [`serve_http`] binds the router and runs it
//! until ctrl-c.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::config::PalaceConfig;
use crate::db;
use crate::generator;
use crate::identity::SqliteIdentity;
use crate::routes::{self, AppState};
use crate::scene::pipeline::PalacePipeline;
use crate::scene::store::SqlitePalaceStore;
use crate::translation::google::GoogleTranslator;

/// Open the database and build every collaborator the handlers need.
pub fn setup_shared_state(config: &PalaceConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let db = Arc::new(Mutex::new(conn));
    build_state(db, config)
}

/// Build state over an already-open connection.
pub fn build_state(db: Arc<Mutex<rusqlite::Connection>>, config: &PalaceConfig) -> Result<AppState> {
    let model = generator::create_model_handle(&config.generator)
        .context("failed to initialize generative model")?;
    tracing::info!(model = %model.model(), ready = model.is_initialized(), "generator configured");

    let pipeline = PalacePipeline::new(
        Arc::new(model),
        Arc::new(GoogleTranslator::new(&config.translator)),
        Arc::new(SqlitePalaceStore::new(db.clone())),
    );
    let identity = Arc::new(SqliteIdentity::new(db, config.accounts.min_password_length));

    Ok(AppState { pipeline, identity })
}

/// Serve the HTTP API on the configured address.
pub async fn serve_http(config: PalaceConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting palace server");

    let state = setup_shared_state(&config)?;
    let router = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down HTTP server");
}
