use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::auth::AuthUser;
use super::error::AppResult;
use super::AppState;
use crate::scene::types::{GenerationRequest, SavedPalace};

#[derive(Debug, Serialize)]
pub struct PalaceList {
    pub total: usize,
    pub palaces: Vec<SavedPalace>,
}

/// Generate and save a palace. Without an explicit language the caller's
/// preferred language is used.
pub async fn create_palace(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(mut request): Json<GenerationRequest>,
) -> AppResult<(StatusCode, Json<SavedPalace>)> {
    if request.target_language.is_none() {
        let profile = state.identity.profile(&auth.user_id).await?;
        request.target_language = Some(profile.preferred_language.code().to_string());
    }

    let saved = state.pipeline.run_generation(&auth.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_palaces(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<PalaceList>> {
    let palaces = state.pipeline.list(&auth.user_id).await?;
    Ok(Json(PalaceList {
        total: palaces.len(),
        palaces,
    }))
}
