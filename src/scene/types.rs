//! Core palace type definitions.
//!
//! Defines [`Language`] (supported translation targets), [`GenerationRequest`]
//! (one user action), [`PalaceScene`] (the persisted record shape), and
//! [`SavedPalace`] (a scene with its store-assigned id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target languages offered for scene translation.
///
/// Serialized as its ISO 639-1 code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "pa")]
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Self::English,
        Self::Hindi,
        Self::Tamil,
        Self::Telugu,
        Self::Kannada,
        Self::Bengali,
        Self::Marathi,
        Self::Gujarati,
        Self::Malayalam,
        Self::Punjabi,
    ];

    /// ISO 639-1 code sent to the translation service.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Kannada => "kn",
            Self::Bengali => "bn",
            Self::Marathi => "mr",
            Self::Gujarati => "gu",
            Self::Malayalam => "ml",
            Self::Punjabi => "pa",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Kannada => "Kannada",
            Self::Bengali => "Bengali",
            Self::Marathi => "Marathi",
            Self::Gujarati => "Gujarati",
            Self::Malayalam => "Malayalam",
            Self::Punjabi => "Punjabi",
        }
    }

    /// English scenes are generated natively, so English never needs translating.
    pub fn needs_translation(&self) -> bool {
        *self != Self::English
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| format!("unsupported language code: {s}"))
    }
}

/// One generation request from a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub location: String,
    /// Target language code; `None` means `"en"` (no translation).
    #[serde(default, alias = "language")]
    pub target_language: Option<String>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            location: location.into(),
            target_language: None,
        }
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.target_language = Some(code.into());
        self
    }
}

/// A generated memory palace scene, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalaceScene {
    pub topic: String,
    pub location: String,
    /// Trimmed generator output. Never empty.
    pub english_scene: String,
    /// Present only together with `language_code`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_scene: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A scene together with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPalace {
    /// UUID v7 primary key.
    pub id: String,
    #[serde(flatten)]
    pub scene: PalaceScene,
}
