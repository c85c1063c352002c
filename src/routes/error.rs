use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::identity::IdentityError;
use crate::scene::pipeline::PipelineError;
use crate::scene::store::StoreError;

/// Error type for HTTP handlers. Renders as `{ "error": message, "code": CODE }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("missing or invalid bearer token")]
    Unauthorized,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Pipeline(err) => classify_pipeline_error(err),
            AppError::Identity(err) => classify_identity_error(err),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store error");
                internal()
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_pipeline_error(err: &PipelineError) -> (StatusCode, &'static str, String) {
    let message = err.user_message();
    match err {
        PipelineError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", message),
        PipelineError::UninitializedModel => {
            tracing::error!("generation requested but the model was never initialized");
            (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE", message)
        }
        PipelineError::GenerationFailed(e) if e.is_quota() => {
            (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXCEEDED", message)
        }
        PipelineError::GenerationFailed(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "GENERATION_FAILED", message)
        }
        PipelineError::InvalidRecord(_) => internal(),
        PipelineError::PersistenceFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "PERSISTENCE_FAILED",
            message,
        ),
    }
}

fn classify_identity_error(err: &IdentityError) -> (StatusCode, &'static str, String) {
    match err {
        IdentityError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        IdentityError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", err.to_string())
        }
        IdentityError::InvalidSession => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string()),
        IdentityError::EmailTaken => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        IdentityError::UnknownUser(_) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Account not found".to_string(),
        ),
        IdentityError::Hash(_) | IdentityError::Database(_) | IdentityError::Task(_) => {
            tracing::error!(error = %err, "identity error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationError;

    #[test]
    fn quota_maps_to_429() {
        let err = AppError::from(PipelineError::from(GenerationError::QuotaExceeded(
            "daily".into(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let err = AppError::from(PipelineError::InvalidInput("topic must not be empty".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_email_maps_to_409() {
        let err = AppError::from(IdentityError::EmailTaken);
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
