pub mod auth;
pub mod error;
pub mod palaces;
pub mod profile;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::identity::IdentityProvider;
use crate::scene::pipeline::PalacePipeline;
use crate::scene::types::Language;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PalacePipeline,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Build the HTTP router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route(
            "/palaces",
            get(palaces::list_palaces).post(palaces::create_palace),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn languages() -> Json<Value> {
    let list: Vec<Value> = Language::ALL
        .iter()
        .map(|lang| json!({ "code": lang.code(), "name": lang.name() }))
        .collect();
    Json(Value::Array(list))
}
