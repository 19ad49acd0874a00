//! User account, session, and audit log operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// How long a session stays valid without a fresh sign-in.
pub const SESSION_TTL_DAYS: i64 = 30;

impl Database {
    /// Create a user. The password must already be hashed.
    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(Error::InvalidData(format!(
                "email already registered: {}",
                email
            )));
        }

        conn.execute(
            "INSERT INTO users (email, password_hash) VALUES (?, ?)",
            params![email, password_hash],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<User> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, email, created_at FROM users WHERE id = ?",
            params![id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Get a user and their stored password hash by email
    pub fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, email, created_at, password_hash FROM users WHERE email = ?",
                params![email],
                |row| {
                    Ok((
                        User {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            created_at: parse_datetime(&row.get::<_, String>(2)?),
                        },
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        Ok(row)
    }

    /// List all users (CLI administration)
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, email, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Record a session token digest for a user
    pub fn create_session(&self, user_id: i64, token_digest: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (user_id, token_digest, expires_at)
             VALUES (?, ?, datetime('now', ?))",
            params![user_id, token_digest, format!("+{} days", SESSION_TTL_DAYS)],
        )?;
        Ok(())
    }

    /// Resolve a token digest to its user, if the session is still live
    pub fn session_user(&self, token_digest: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                r#"
                SELECT u.id, u.email, u.created_at
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token_digest = ? AND s.expires_at > datetime('now')
                "#,
                params![token_digest],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        created_at: parse_datetime(&row.get::<_, String>(2)?),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Delete a session. Returns whether a session was actually removed.
    pub fn delete_session(&self, token_digest: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_digest = ?",
            params![token_digest],
        )?;
        Ok(deleted > 0)
    }

    /// Drop expired sessions. Returns the number removed.
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= datetime('now')",
            [],
        )?;
        Ok(purged)
    }

    /// Append an audit log entry
    pub fn log_audit(
        &self,
        user_email: &str,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
        details: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_log (user_email, action, entity_type, entity_id, details)
             VALUES (?, ?, ?, ?, ?)",
            params![user_email, action, entity_type, entity_id, details],
        )?;
        Ok(())
    }

    /// Count audit entries (surfaced in CLI status)
    pub fn count_audit_entries(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?)
    }
}
