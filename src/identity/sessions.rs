use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::timestamp;

/// Issue a new bearer token for `user_id`.
pub fn create_session(conn: &Connection, user_id: &str) -> rusqlite::Result<String> {
    let token = uuid::Uuid::new_v4().simple().to_string();
    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, timestamp(Utc::now())],
    )?;
    Ok(token)
}

pub fn resolve_session(conn: &Connection, token: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT user_id FROM sessions WHERE token = ?1",
        params![token],
        |row| row.get(0),
    )
    .optional()
}

/// Returns `true` if a session was removed.
pub fn delete_session(conn: &Connection, token: &str) -> rusqlite::Result<bool> {
    let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(removed > 0)
}
