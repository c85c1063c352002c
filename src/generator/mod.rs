//! Scene generation via a hosted generative-text model.
//!
//! Provides the [`SceneGenerator`] trait, the [`ModelHandle`] that owns the
//! one-time-initialized Gemini client, and [`create_model_handle`] which builds
//! the handle from configuration at startup.

pub mod gemini;

use std::sync::OnceLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::GeneratorConfig;
use gemini::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generative model is not initialized")]
    UninitializedModel,

    #[error("generative model is already initialized with a different API key")]
    AlreadyInitialized,

    #[error("no API key provided for the generative model")]
    MissingApiKey,

    #[error("generation quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("generation request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("generation API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid generation response: {0}")]
    InvalidResponse(String),

    #[error("generation response contained no text")]
    EmptyResponse,
}

impl GenerationError {
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

/// Turns a prompt into scene text.
///
/// Implementations return whitespace-trimmed, non-empty text or an error. One
/// attempt per call; no retries.
#[async_trait]
pub trait SceneGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Holder of the configured generative-text client.
///
/// Created empty at startup and initialized once with an API key. Calling
/// [`ModelHandle::initialize`] again with the same key is a no-op; a different
/// key is rejected so in-flight requests never see the client swapped.
pub struct ModelHandle {
    config: GeneratorConfig,
    client: OnceLock<GeminiClient>,
}

impl ModelHandle {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            config: config.clone(),
            client: OnceLock::new(),
        }
    }

    pub fn initialize(&self, api_key: &str) -> Result<(), GenerationError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let mut created = false;
        let client = self.client.get_or_init(|| {
            created = true;
            GeminiClient::new(&self.config, api_key)
        });

        if created {
            tracing::info!(model = %self.config.model, "generative model initialized");
            Ok(())
        } else if client.api_key() == api_key {
            tracing::debug!("generative model already initialized");
            Ok(())
        } else {
            Err(GenerationError::AlreadyInitialized)
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl SceneGenerator for ModelHandle {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let client = self
            .client
            .get()
            .ok_or(GenerationError::UninitializedModel)?;

        let text = client.generate_content(prompt).await?;
        let scene = text.trim();
        if scene.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(scene.to_string())
    }
}

/// Build the model handle from config, initializing it when an API key is set.
///
/// A missing key is not fatal here: the server still serves accounts and
/// listings, and generation reports [`GenerationError::UninitializedModel`].
pub fn create_model_handle(config: &GeneratorConfig) -> Result<ModelHandle> {
    let handle = ModelHandle::new(config);
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => handle.initialize(key)?,
        _ => tracing::warn!("GEMINI_API_KEY not set, scene generation is unavailable"),
    }
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_before_initialize_fails() {
        let handle = ModelHandle::new(&GeneratorConfig::default());
        assert!(!handle.is_initialized());

        for _ in 0..3 {
            let err = handle.generate("anything").await.unwrap_err();
            assert!(matches!(err, GenerationError::UninitializedModel));
        }
    }

    #[test]
    fn initialize_is_idempotent_for_same_key() {
        let handle = ModelHandle::new(&GeneratorConfig::default());
        handle.initialize("key-one").unwrap();
        handle.initialize("key-one").unwrap();
        assert!(handle.is_initialized());
    }

    #[test]
    fn initialize_rejects_different_key() {
        let handle = ModelHandle::new(&GeneratorConfig::default());
        handle.initialize("key-one").unwrap();
        let err = handle.initialize("key-two").unwrap_err();
        assert!(matches!(err, GenerationError::AlreadyInitialized));
    }

    #[test]
    fn initialize_rejects_blank_key() {
        let handle = ModelHandle::new(&GeneratorConfig::default());
        let err = handle.initialize("   ").unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
        assert!(!handle.is_initialized());
    }

    #[test]
    fn create_without_key_leaves_handle_uninitialized() {
        let handle = create_model_handle(&GeneratorConfig::default()).unwrap();
        assert!(!handle.is_initialized());
    }

    #[test]
    fn create_with_blank_key_leaves_handle_uninitialized() {
        for key in ["", "   "] {
            let config = GeneratorConfig {
                api_key: Some(key.to_string()),
                ..GeneratorConfig::default()
            };
            let handle = create_model_handle(&config).unwrap();
            assert!(!handle.is_initialized());
        }
    }

    #[test]
    fn create_with_key_initializes_handle() {
        let config = GeneratorConfig {
            api_key: Some(" key-one ".to_string()),
            ..GeneratorConfig::default()
        };
        assert!(create_model_handle(&config).unwrap().is_initialized());
    }
}
