use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{AppError, AppResult};
use super::AppState;
use crate::identity::{IdentityError, SignUp};

/// The signed-in caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let user_id = state
            .identity
            .resolve_session(&token)
            .await
            .map_err(|e| match e {
                IdentityError::InvalidSession => AppError::Unauthorized,
                other => AppError::from(other),
            })?;

        Ok(Self { user_id, token })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignUp>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let user_id = state.identity.sign_up(request).await?;
    let token = state.identity.issue_session(&user_id).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse { user_id, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let user_id = state
        .identity
        .sign_in(&request.email, &request.password)
        .await?;
    let token = state.identity.issue_session(&user_id).await?;
    Ok(Json(SessionResponse { user_id, token }))
}

pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.identity.revoke_session(&auth.token).await?;
    tracing::info!(user_id = %auth.user_id, "signed out");
    Ok(StatusCode::NO_CONTENT)
}
