//! User operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(2)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Insert a user with an already-hashed password
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;

        // The UNIQUE constraint decides races between concurrent signups
        match conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)",
            params![username, password_hash],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(Error::UsernameTaken(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
        let id = conn.last_insert_rowid();
        debug!(user_id = id, "Created user");

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by exact username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        debug!(username = %username, "Looking up user");
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE username = ?",
                params![username],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Stored PHC hash for a username
    pub fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let hash = conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }

    /// Get a user or fail with [`Error::NotFound`]
    pub(crate) fn require_user(&self, id: i64) -> Result<User> {
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }
}
