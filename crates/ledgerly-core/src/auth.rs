//! Passwords, session tokens, and session change events
//!
//! Passwords are stored as Argon2id PHC strings. Session tokens are random
//! 256-bit values handed to the client once; only their SHA-256 digest is
//! persisted, so a leaked database cannot be replayed as a session.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::broadcast;

use crate::error::{Error, Result};

/// Hash a password for storage (Argon2id, random salt, PHC string output).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| Error::Auth(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generate a fresh session token (hex-encoded 32 random bytes).
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a token, hex-encoded. This is what gets stored.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// A session state change, published when a user signs in or out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: i64, email: String },
    SignedOut { user_id: i64 },
}

/// Broadcast channel for session changes.
///
/// Callers that need to react to sign-in/sign-out acquire a
/// [`SessionSubscription`] and release it by dropping it - there is exactly
/// one cancellation handle per subscriber, no ambient global state.
#[derive(Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        // Slow subscribers miss events rather than blocking publishers
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Publish a session change. Dropped silently when nobody is listening.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's handle on the session event stream. Dropping the handle
/// cancels the subscription.
pub struct SessionSubscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Wait for the next session event. `None` when the channel is closed.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                // Fell behind; skip to the oldest retained event
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
