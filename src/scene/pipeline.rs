//! Scene generation pipeline.
//!
//! [`PalacePipeline::run_generation`] is the single entry point. Per call it
//! walks `Validating → Composing → Generating → TranslatingOptional →
//! Persisting → Done`. Generation, validation and persistence failures abort
//! the run; a translation failure only drops the translated section.

use std::sync::Arc;

use chrono::Utc;

use crate::generator::{GenerationError, SceneGenerator};
use crate::scene::prompt;
use crate::scene::record::{self, RecordError};
use crate::scene::store::{PalaceStore, StoreError};
use crate::scene::types::{GenerationRequest, Language, SavedPalace};
use crate::translation::Translator;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generative model is not initialized")]
    UninitializedModel,

    #[error("scene generation failed: {0}")]
    GenerationFailed(#[source] GenerationError),

    #[error("could not build palace record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("failed to save palace: {0}")]
    PersistenceFailed(#[source] StoreError),
}

impl PipelineError {
    /// Text safe to show the person who triggered the run.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::GenerationFailed(e) if e.is_quota() => {
                "Reached today's generation limit. Please try again later.".into()
            }
            Self::GenerationFailed(_) | Self::UninitializedModel => {
                "Could not generate a scene right now. Please try again later.".into()
            }
            Self::InvalidRecord(_) | Self::PersistenceFailed(_) => {
                "Your palace could not be saved. Please generate it again.".into()
            }
        }
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::UninitializedModel => Self::UninitializedModel,
            other => Self::GenerationFailed(other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Validating,
    Composing,
    Generating,
    TranslatingOptional,
    Persisting,
    Done,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Composing => "composing",
            Self::Generating => "generating",
            Self::TranslatingOptional => "translating_optional",
            Self::Persisting => "persisting",
            Self::Done => "done",
        }
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = stage.as_str(), "pipeline stage");
}

/// Validated form of a [`GenerationRequest`].
struct ValidRequest {
    topic: String,
    location: String,
    language: Language,
}

fn validate(request: &GenerationRequest) -> Result<ValidRequest, PipelineError> {
    let topic = request.topic.trim();
    let location = request.location.trim();

    if topic.is_empty() {
        return Err(PipelineError::InvalidInput("topic must not be empty".into()));
    }
    if location.is_empty() {
        return Err(PipelineError::InvalidInput("location must not be empty".into()));
    }

    let language = match request.target_language.as_deref() {
        Some(code) if !code.trim().is_empty() => {
            code.parse::<Language>().map_err(PipelineError::InvalidInput)?
        }
        _ => Language::English,
    };

    Ok(ValidRequest {
        topic: topic.to_string(),
        location: location.to_string(),
        language,
    })
}

/// Composes prompt, generator, translator and store for one generation run.
#[derive(Clone)]
pub struct PalacePipeline {
    generator: Arc<dyn SceneGenerator>,
    translator: Arc<dyn Translator>,
    store: Arc<dyn PalaceStore>,
}

impl PalacePipeline {
    pub fn new(
        generator: Arc<dyn SceneGenerator>,
        translator: Arc<dyn Translator>,
        store: Arc<dyn PalaceStore>,
    ) -> Self {
        Self {
            generator,
            translator,
            store,
        }
    }

    /// Generate, optionally translate, and persist a palace for `user_id`.
    pub async fn run_generation(
        &self,
        user_id: &str,
        request: &GenerationRequest,
    ) -> Result<SavedPalace, PipelineError> {
        enter(Stage::Validating);
        let request = validate(request)?;

        tracing::info!(
            user_id = %user_id,
            topic = %request.topic,
            location = %request.location,
            language = %request.language,
            "generating palace"
        );

        enter(Stage::Composing);
        let prompt = prompt::compose(&request.topic, &request.location);

        enter(Stage::Generating);
        let english_scene = self.generator.generate(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "scene generation failed");
            PipelineError::from(e)
        })?;

        enter(Stage::TranslatingOptional);
        let (translated_scene, language_code) = if request.language.needs_translation() {
            match self
                .translator
                .translate(&english_scene, request.language.code())
                .await
            {
                Ok(text) => (Some(text), Some(request.language.code().to_string())),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        language = %request.language,
                        "translation failed, saving without translated scene"
                    );
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        enter(Stage::Persisting);
        let scene = record::build(
            &request.topic,
            &request.location,
            &english_scene,
            translated_scene,
            language_code,
            Utc::now(),
        )?;

        let id = self
            .store
            .append_scene(user_id, &scene)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "failed to persist palace");
                PipelineError::PersistenceFailed(e)
            })?;

        enter(Stage::Done);
        tracing::info!(
            id = %id,
            scene_len = scene.english_scene.len(),
            translated = scene.translated_scene.is_some(),
            "palace saved"
        );

        Ok(SavedPalace { id, scene })
    }

    /// All saved palaces of `user_id`, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<SavedPalace>, StoreError> {
        self.store.list_scenes(user_id).await
    }
}
