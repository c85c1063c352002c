//! Google Translate client (`translate_a/single`, `client=gtx`).
//!
//! The endpoint answers with nested JSON arrays; the first element holds one
//! `[translated, original, ...]` entry per sentence. Long input is sent in
//! whitespace-aligned chunks and the translations are re-joined in order.

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{TranslationError, Translator};
use crate::config::TranslatorConfig;

pub struct GoogleTranslator {
    client: Client,
    base_url: String,
    max_chunk_chars: usize,
}

impl GoogleTranslator {
    pub fn new(config: &TranslatorConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_chunk_chars: config.max_chunk_chars.max(1),
        }
    }

    async fn translate_chunk(&self, chunk: &str, target_code: &str) -> Result<String, TranslationError> {
        let url = Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_code),
                ("dt", "t"),
                ("q", chunk),
            ],
        )
        .map_err(|e| TranslationError::InvalidResponse(format!("bad translator URL: {e}")))?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        parse_translation(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        let chunks = chunk_text(text, self.max_chunk_chars);
        tracing::debug!(
            target_language = %target_code,
            text_len = text.len(),
            chunks = chunks.len(),
            "translating scene"
        );

        let mut translated = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            if chunk.trim().is_empty() {
                translated.push(String::new());
                continue;
            }
            translated.push(self.translate_chunk(chunk, target_code).await?);
        }

        Ok(join_chunks(&chunks, &translated))
    }
}

/// Re-join translated pieces, carrying over the whitespace that ended each
/// source chunk so paragraph breaks at chunk boundaries survive.
fn join_chunks(sources: &[String], translated: &[String]) -> String {
    let mut out = String::new();
    for (source, piece) in sources.iter().zip(translated) {
        out.push_str(piece.trim());
        out.push_str(&source[source.trim_end().len()..]);
    }
    out.trim().to_string()
}

/// Pull the translated sentences out of a `translate_a/single` response.
fn parse_translation(body: &serde_json::Value) -> Result<String, TranslationError> {
    let sentences = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslationError::InvalidResponse("missing sentence array".into()))?;

    let text: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(TranslationError::InvalidResponse("empty translation".into()));
    }
    Ok(text)
}

/// Split `text` into pieces of at most `max_chars` characters, breaking after
/// whitespace. A single word longer than `max_chars` becomes its own piece.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for piece in text.split_inclusive(char::is_whitespace) {
        let piece_chars = piece.chars().count();
        if current_chars > 0 && current_chars + piece_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        current.push_str(piece);
        current_chars += piece_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
