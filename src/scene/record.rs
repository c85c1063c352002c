use chrono::{DateTime, Utc};

use crate::scene::types::PalaceScene;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("generated scene is empty")]
    EmptyScene,

    #[error("translated scene has no language code")]
    TranslationWithoutLanguage,

    #[error("language code {0} has no translated scene")]
    LanguageWithoutTranslation(String),
}

/// Assemble the persisted record. Pure; no I/O.
///
/// `translated_scene` and `language_code` must be both present or both absent.
pub fn build(
    topic: &str,
    location: &str,
    english_scene: &str,
    translated_scene: Option<String>,
    language_code: Option<String>,
    now: DateTime<Utc>,
) -> Result<PalaceScene, RecordError> {
    if english_scene.trim().is_empty() {
        return Err(RecordError::EmptyScene);
    }

    match (&translated_scene, &language_code) {
        (Some(_), None) => return Err(RecordError::TranslationWithoutLanguage),
        (None, Some(code)) => return Err(RecordError::LanguageWithoutTranslation(code.clone())),
        _ => {}
    }

    Ok(PalaceScene {
        topic: topic.to_string(),
        location: location.to_string(),
        english_scene: english_scene.to_string(),
        translated_scene,
        language_code,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_english_only_record() {
        let now = Utc::now();
        let scene = build("photosynthesis", "My Home", "A sunlit kitchen", None, None, now).unwrap();
        assert_eq!(scene.english_scene, "A sunlit kitchen");
        assert!(scene.translated_scene.is_none());
        assert!(scene.language_code.is_none());
        assert_eq!(scene.created_at, now);
    }

    #[test]
    fn builds_translated_record() {
        let scene = build(
            "entropy",
            "Library",
            "Books scatter",
            Some("किताबें बिखरती हैं".into()),
            Some("hi".into()),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(scene.language_code.as_deref(), Some("hi"));
        assert!(scene.translated_scene.is_some());
    }

    #[test]
    fn rejects_unpaired_translation_fields() {
        let now = Utc::now();
        assert_eq!(
            build("t", "l", "scene", Some("x".into()), None, now),
            Err(RecordError::TranslationWithoutLanguage)
        );
        assert_eq!(
            build("t", "l", "scene", None, Some("hi".into()), now),
            Err(RecordError::LanguageWithoutTranslation("hi".into()))
        );
    }

    #[test]
    fn rejects_blank_scene() {
        assert_eq!(
            build("t", "l", "  \n", None, None, Utc::now()),
            Err(RecordError::EmptyScene)
        );
    }
}
