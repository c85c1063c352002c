//! Account and profile rows in the `users` table.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{IdentityError, Profession, Profile, ProfileUpdate, SignUp};
use crate::db::{parse_timestamp, timestamp};
use crate::scene::types::Language;

/// Insert a new account. `request` must already be validated and normalized.
pub fn create_account(
    conn: &Connection,
    request: &SignUp,
    password_hash: &str,
) -> Result<String, IdentityError> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        params![request.email],
        |row| row.get(0),
    )?;
    if taken {
        return Err(IdentityError::EmailTaken);
    }

    let id = uuid::Uuid::now_v7().to_string();
    let now = timestamp(Utc::now());
    conn.execute(
        "INSERT INTO users (id, email, password_hash, name, username, profession, bio, avatar, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, '', ?7, ?8, ?8)",
        params![
            id,
            request.email,
            password_hash,
            request.name,
            request.username,
            request.profession.as_str(),
            request.avatar,
            now,
        ],
    )?;

    Ok(id)
}

/// `(user_id, password_hash)` for `email`, if such an account exists.
pub fn find_credentials(
    conn: &Connection,
    email: &str,
) -> Result<Option<(String, String)>, IdentityError> {
    let row = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE email = ?1",
            params![email],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(row)
}

pub fn get_profile(conn: &Connection, user_id: &str) -> Result<Profile, IdentityError> {
    conn.query_row(
        "SELECT id, email, name, username, profession, bio, avatar, preferred_language, created_at \
         FROM users WHERE id = ?1",
        params![user_id],
        |row| {
            let profession: String = row.get(4)?;
            let language: String = row.get(7)?;
            let created_at: String = row.get(8)?;
            Ok(Profile {
                user_id: row.get(0)?,
                email: row.get(1)?,
                name: row.get(2)?,
                username: row.get(3)?,
                profession: profession.parse().unwrap_or_default(),
                bio: row.get(5)?,
                avatar: row.get(6)?,
                preferred_language: language.parse().unwrap_or_default(),
                created_at: parse_timestamp(&created_at)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| IdentityError::UnknownUser(user_id.to_string()))
}

/// Merge `update` into the stored profile. Absent fields keep their value.
pub fn update_profile(
    conn: &Connection,
    user_id: &str,
    update: &ProfileUpdate,
) -> Result<Profile, IdentityError> {
    let current = get_profile(conn, user_id)?;

    let name = non_blank(update.name.as_deref(), "name")?.unwrap_or(current.name);
    let username = non_blank(update.username.as_deref(), "username")?.unwrap_or(current.username);
    let profession: Profession = update.profession.unwrap_or(current.profession);
    let bio = update.bio.clone().unwrap_or(current.bio);
    // An explicit blank avatar clears it.
    let avatar = match update.avatar.as_deref().map(str::trim) {
        Some("") => None,
        Some(v) => Some(v.to_string()),
        None => current.avatar,
    };
    let language: Language = update.preferred_language.unwrap_or(current.preferred_language);

    conn.execute(
        "UPDATE users SET name = ?1, username = ?2, profession = ?3, bio = ?4, avatar = ?5, \
         preferred_language = ?6, updated_at = ?7 WHERE id = ?8",
        params![
            name,
            username,
            profession.as_str(),
            bio,
            avatar,
            language.code(),
            timestamp(Utc::now()),
            user_id,
        ],
    )?;

    get_profile(conn, user_id)
}

fn non_blank(value: Option<&str>, field: &str) -> Result<Option<String>, IdentityError> {
    match value.map(str::trim) {
        Some("") => Err(IdentityError::Validation(format!("{field} must not be empty"))),
        Some(v) => Ok(Some(v.to_string())),
        None => Ok(None),
    }
}
