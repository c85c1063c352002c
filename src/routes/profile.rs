use axum::extract::State;
use axum::Json;

use super::auth::AuthUser;
use super::error::AppResult;
use super::AppState;
use crate::identity::{Profile, ProfileUpdate};

pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Profile>> {
    Ok(Json(state.identity.profile(&auth.user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    let profile = state.identity.update_profile(&auth.user_id, update).await?;
    tracing::info!(user_id = %auth.user_id, "profile updated");
    Ok(Json(profile))
}
