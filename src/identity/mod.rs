//! Accounts, sessions, and profiles.
//!
//! [`IdentityProvider`] is the boundary the HTTP layer uses to turn credentials
//! or bearer tokens into a user id. [`SqliteIdentity`] implements it on top of
//! the `users` and `sessions` tables; passwords are hashed with Argon2id.

pub mod accounts;
pub mod password;
pub mod sessions;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::scene::types::Language;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("invalid session")]
    InvalidSession,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("db task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    #[default]
    Student,
    Professional,
    Other,
}

impl Profession {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professional => "professional",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for Profession {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "professional" => Ok(Self::Professional),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown profession: {s}")),
        }
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUp {
    #[validate(email(message = "invalid email"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    pub profession: Profession,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl SignUp {
    /// Trim text fields and lower-case the email.
    fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
        self.username = self.username.trim().to_string();
        self.avatar = self
            .avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public profile of an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub username: String,
    pub profession: Profession,
    pub bio: String,
    pub avatar: Option<String>,
    /// Default translation target for new palaces.
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
}

/// Partial profile edit; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub profession: Option<Profession>,
    pub bio: Option<String>,
    /// An empty string clears the avatar.
    pub avatar: Option<String>,
    pub preferred_language: Option<Language>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. Returns the new user id.
    async fn sign_up(&self, request: SignUp) -> Result<String, IdentityError>;

    /// Check credentials. Returns the user id.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    async fn issue_session(&self, user_id: &str) -> Result<String, IdentityError>;

    /// User id behind a bearer token, or [`IdentityError::InvalidSession`].
    async fn resolve_session(&self, token: &str) -> Result<String, IdentityError>;

    async fn revoke_session(&self, token: &str) -> Result<(), IdentityError>;

    async fn profile(&self, user_id: &str) -> Result<Profile, IdentityError>;

    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, IdentityError>;
}

/// [`IdentityProvider`] over a shared SQLite connection.
#[derive(Clone)]
pub struct SqliteIdentity {
    db: Arc<Mutex<Connection>>,
    min_password_length: usize,
}

impl SqliteIdentity {
    pub fn new(db: Arc<Mutex<Connection>>, min_password_length: usize) -> Self {
        Self {
            db,
            min_password_length,
        }
    }

    /// Run `f` on the blocking pool. `f` receives the shared connection and
    /// decides itself how long to hold the lock.
    async fn blocking<T, F>(&self, f: F) -> Result<T, IdentityError>
    where
        T: Send + 'static,
        F: FnOnce(&Mutex<Connection>) -> Result<T, IdentityError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| IdentityError::Task(e.to_string()))?
    }
}

fn lock(db: &Mutex<Connection>) -> Result<std::sync::MutexGuard<'_, Connection>, IdentityError> {
    db.lock()
        .map_err(|e| IdentityError::Task(format!("db lock poisoned: {e}")))
}

#[async_trait]
impl IdentityProvider for SqliteIdentity {
    async fn sign_up(&self, request: SignUp) -> Result<String, IdentityError> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| IdentityError::Validation(e.to_string()))?;
        password::validate_password_strength(&request.password, self.min_password_length)
            .map_err(IdentityError::Validation)?;

        let user_id = self
            .blocking(move |db| {
                let hash = password::hash_password(&request.password)
                    .map_err(|e| IdentityError::Hash(e.to_string()))?;
                let conn = lock(db)?;
                accounts::create_account(&conn, &request, &hash)
            })
            .await?;

        tracing::info!(user_id = %user_id, "account created");
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let email = normalize_email(email);
        let secret = password.to_string();

        let result = self
            .blocking(move |db| {
                let credentials = {
                    let conn = lock(db)?;
                    accounts::find_credentials(&conn, &email)?
                };
                let Some((user_id, hash)) = credentials else {
                    password::verify_dummy(&secret);
                    return Err(IdentityError::InvalidCredentials);
                };
                let matches = password::verify_password(&secret, &hash)
                    .map_err(|e| IdentityError::Hash(e.to_string()))?;
                if matches {
                    Ok(user_id)
                } else {
                    Err(IdentityError::InvalidCredentials)
                }
            })
            .await;

        match &result {
            Ok(user_id) => tracing::info!(user_id = %user_id, "signed in"),
            Err(e) => tracing::warn!(error = %e, "sign-in rejected"),
        }
        result
    }

    async fn issue_session(&self, user_id: &str) -> Result<String, IdentityError> {
        let user_id = user_id.to_string();
        self.blocking(move |db| {
            let conn = lock(db)?;
            Ok(sessions::create_session(&conn, &user_id)?)
        })
        .await
    }

    async fn resolve_session(&self, token: &str) -> Result<String, IdentityError> {
        let token = token.to_string();
        self.blocking(move |db| {
            let conn = lock(db)?;
            sessions::resolve_session(&conn, &token)?.ok_or(IdentityError::InvalidSession)
        })
        .await
    }

    async fn revoke_session(&self, token: &str) -> Result<(), IdentityError> {
        let token = token.to_string();
        self.blocking(move |db| {
            let conn = lock(db)?;
            sessions::delete_session(&conn, &token)?;
            Ok(())
        })
        .await
    }

    async fn profile(&self, user_id: &str) -> Result<Profile, IdentityError> {
        let user_id = user_id.to_string();
        self.blocking(move |db| {
            let conn = lock(db)?;
            accounts::get_profile(&conn, &user_id)
        })
        .await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, IdentityError> {
        let user_id = user_id.to_string();
        self.blocking(move |db| {
            let conn = lock(db)?;
            accounts::update_profile(&conn, &user_id, &update)
        })
        .await
    }
}
