//! Scene translation.
//!
//! [`Translator`] is the seam the pipeline depends on; [`google::GoogleTranslator`]
//! is the production implementation. Failures are returned as
//! [`TranslationError`], never folded into the translated text.

pub mod google;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("translation API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid translation response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

/// Translate text into a target language, auto-detecting the source.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError>;
}
