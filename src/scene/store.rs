//! Persistence boundary for generated palaces.
//!
//! [`PalaceStore`] is what the pipeline talks to. [`SqlitePalaceStore`] backs it
//! with the `palaces` table; the synchronous [`insert_palace`] / [`list_palaces`]
//! functions hold the SQL and are run on the blocking pool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::db::{parse_timestamp, timestamp};
use crate::scene::types::{PalaceScene, SavedPalace};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("db task failed: {0}")]
    Task(String),
}

/// Append/list operations the pipeline needs from the palace store.
#[async_trait]
pub trait PalaceStore: Send + Sync {
    /// Persist `scene` as a child of `user_id`. Returns the assigned id.
    async fn append_scene(&self, user_id: &str, scene: &PalaceScene) -> Result<String, StoreError>;

    /// All palaces of `user_id`, newest first.
    async fn list_scenes(&self, user_id: &str) -> Result<Vec<SavedPalace>, StoreError>;
}

/// Insert a palace row for `user_id`. Returns the new UUID v7.
pub fn insert_palace(
    conn: &Connection,
    user_id: &str,
    scene: &PalaceScene,
) -> Result<String, StoreError> {
    let user_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        params![user_id],
        |row| row.get(0),
    )?;
    if !user_exists {
        return Err(StoreError::UnknownUser(user_id.to_string()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO palaces (id, user_id, topic, location, scene, translated_scene, language_code, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            user_id,
            scene.topic,
            scene.location,
            scene.english_scene,
            scene.translated_scene,
            scene.language_code,
            timestamp(scene.created_at),
        ],
    )?;

    Ok(id)
}

/// Palaces of `user_id` ordered by `created_at` descending.
pub fn list_palaces(conn: &Connection, user_id: &str) -> Result<Vec<SavedPalace>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, topic, location, scene, translated_scene, language_code, created_at \
         FROM palaces WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
    )?;

    let palaces = stmt
        .query_map(params![user_id], |row| {
            let created_at: String = row.get(6)?;
            Ok(SavedPalace {
                id: row.get(0)?,
                scene: PalaceScene {
                    topic: row.get(1)?,
                    location: row.get(2)?,
                    english_scene: row.get(3)?,
                    translated_scene: row.get(4)?,
                    language_code: row.get(5)?,
                    created_at: parse_timestamp(&created_at)?,
                },
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(palaces)
}

/// Number of palaces stored for `user_id`.
pub fn count_palaces(conn: &Connection, user_id: &str) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM palaces WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// [`PalaceStore`] over a shared SQLite connection.
#[derive(Clone)]
pub struct SqlitePalaceStore {
    db: Arc<Mutex<Connection>>,
}

impl SqlitePalaceStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|e| StoreError::Task(format!("db lock poisoned: {e}")))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl PalaceStore for SqlitePalaceStore {
    async fn append_scene(&self, user_id: &str, scene: &PalaceScene) -> Result<String, StoreError> {
        let user_id = user_id.to_string();
        let scene = scene.clone();
        self.with_conn(move |conn| insert_palace(conn, &user_id, &scene))
            .await
    }

    async fn list_scenes(&self, user_id: &str) -> Result<Vec<SavedPalace>, StoreError> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| list_palaces(conn, &user_id)).await
    }
}
