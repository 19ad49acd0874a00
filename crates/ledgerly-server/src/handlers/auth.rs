//! Authentication handlers: sign-up, sign-in, sign-out, current user

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{bearer_token, AppError, AppState, AuthUser, SuccessResponse};
use ledgerly_core::auth::{self, SessionEvent};
use ledgerly_core::models::User;
use ledgerly_core::Error;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 6;

/// Request body for sign-up and sign-in
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response for successful sign-up/sign-in
#[derive(Serialize)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests. Only its digest is stored.
    pub token: String,
    pub user: User,
}

fn validate_credentials(creds: &Credentials) -> Result<(), AppError> {
    if !creds.email.contains('@') {
        return Err(AppError::bad_request("Invalid email address"));
    }
    if creds.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

/// Mint a session for a user: store the token digest, hand back the raw token
fn open_session(state: &AppState, user: &User) -> Result<String, AppError> {
    let token = auth::generate_token();
    state.db.create_session(user.id, &auth::token_digest(&token))?;
    state.events.publish(SessionEvent::SignedIn {
        user_id: user.id,
        email: user.email.clone(),
    });
    Ok(token)
}

/// POST /api/auth/signup - Create an account and sign in
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(creds): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    validate_credentials(&creds)?;

    let email = creds.email.trim().to_lowercase();
    let hash = auth::hash_password(&creds.password)?;

    let user_id = match state.db.create_user(&email, &hash) {
        Ok(id) => id,
        Err(Error::InvalidData(_)) => {
            return Err(AppError::conflict("Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };
    let user = state.db.get_user(user_id)?;

    let token = open_session(&state, &user)?;

    state
        .db
        .log_audit(&user.email, "signup", Some("user"), None, None)?;

    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/auth/signin - Sign in with email and password
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(creds): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = creds.email.trim().to_lowercase();

    // Same error for unknown email and wrong password
    let (user, stored_hash) = state
        .db
        .get_user_with_password(&email)?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !auth::verify_password(&creds.password, &stored_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = open_session(&state, &user)?;

    state
        .db
        .log_audit(&user.email, "signin", Some("user"), None, None)?;

    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/auth/signout - End the current session
pub async fn signout(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    if let Some(token) = bearer_token(request.headers()) {
        state.db.delete_session(&auth::token_digest(token))?;
    }
    state
        .events
        .publish(SessionEvent::SignedOut { user_id: user.id });

    state
        .db
        .log_audit(&user.email, "signout", Some("user"), None, None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<User> {
    Json(user)
}
