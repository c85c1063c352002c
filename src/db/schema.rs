//! SQL DDL for the palace tables.
//!
//! Defines `users`, `palaces`, `sessions`, and `schema_meta`. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization. Columns added after v1 live
//! in [`super::migrations`].

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- Accounts and profile data
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    username TEXT NOT NULL,
    profession TEXT NOT NULL DEFAULT 'student' CHECK(profession IN ('student','professional','other')),
    bio TEXT NOT NULL DEFAULT '',
    avatar TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Generated scenes, one row per palace
CREATE TABLE IF NOT EXISTS palaces (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    topic TEXT NOT NULL,
    location TEXT NOT NULL,
    scene TEXT NOT NULL CHECK(length(scene) > 0),
    translated_scene TEXT,
    language_code TEXT,
    created_at TEXT NOT NULL,
    CHECK((translated_scene IS NULL) = (language_code IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_palaces_user_created ON palaces(user_id, created_at);

-- Bearer tokens
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
