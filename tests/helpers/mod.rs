#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use palace::db;
use palace::generator::{GenerationError, SceneGenerator};
use palace::identity::{accounts, Profession, SignUp};
use palace::scene::store::{PalaceStore, StoreError};
use palace::scene::types::{PalaceScene, SavedPalace};
use palace::translation::{TranslationError, Translator};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// [`test_db`] behind the shared handle the async collaborators expect.
pub fn shared_db() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(test_db()))
}

pub fn sign_up_form(email: &str) -> SignUp {
    SignUp {
        email: email.to_string(),
        password: "correct horse".to_string(),
        name: "Asha Rao".to_string(),
        username: "asha".to_string(),
        profession: Profession::Student,
        avatar: None,
    }
}

/// Insert a user row directly. Returns the user id.
pub fn create_user(conn: &Connection, email: &str) -> String {
    accounts::create_account(conn, &sign_up_form(email), "not-a-real-hash").unwrap()
}

/// Generator that returns a fixed scene and records every prompt.
#[derive(Default)]
pub struct StubGenerator {
    pub scene: String,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(scene: &str) -> Self {
        Self {
            scene: scene.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl SceneGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.scene.clone())
    }
}

/// Generator that always fails with a quota error.
pub struct QuotaGenerator;

#[async_trait]
impl SceneGenerator for QuotaGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::QuotaExceeded(
            "Quota exceeded for generate_content_free_tier_requests".to_string(),
        ))
    }
}

/// Translator that tags the text with the target code.
#[derive(Default)]
pub struct StubTranslator {
    calls: AtomicUsize,
}

impl StubTranslator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{target_code}] {text}"))
    }
}

/// Translator whose remote side always answers 503.
pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str, _target_code: &str) -> Result<String, TranslationError> {
        Err(TranslationError::Api {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

/// Translator whose remote side never answers in time.
pub struct SlowTranslator;

#[async_trait]
impl Translator for SlowTranslator {
    async fn translate(&self, _text: &str, _target_code: &str) -> Result<String, TranslationError> {
        Err(TranslationError::Timeout)
    }
}

/// Store that refuses every write.
pub struct FailingStore;

#[async_trait]
impl PalaceStore for FailingStore {
    async fn append_scene(&self, _user_id: &str, _scene: &PalaceScene) -> Result<String, StoreError> {
        Err(StoreError::Task("disk full".to_string()))
    }

    async fn list_scenes(&self, _user_id: &str) -> Result<Vec<SavedPalace>, StoreError> {
        Ok(Vec::new())
    }
}
