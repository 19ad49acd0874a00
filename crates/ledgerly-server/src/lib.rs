//! Ledgerly Web Server
//!
//! Axum-based REST API for the Ledgerly budget tracker.
//!
//! Security features:
//! - Bearer-token sessions (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Full audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use ledgerly_core::auth::{self, SessionEvents};
use ledgerly_core::db::Database;
use ledgerly_core::models::User;

mod handlers;

/// Authorization header for bearer-token auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Placeholder account used when authentication is disabled
const LOCAL_DEV_EMAIL: &str = "local@ledgerly.dev";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only in production)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Broadcast channel for sign-in/sign-out events
    pub events: SessionEvents,
}

/// The authenticated user, resolved once by the auth middleware and handed
/// to handlers as a request extension. Handlers never reach into ambient
/// session state.
#[derive(Clone)]
pub struct AuthUser(pub User);

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Look up (or lazily create) the local-dev placeholder account
fn local_dev_user(db: &Database) -> Result<User, ledgerly_core::Error> {
    if let Some((user, _)) = db.get_user_with_password(LOCAL_DEV_EMAIL)? {
        return Ok(user);
    }
    // Random password so the account can never be signed into directly
    let hash = auth::hash_password(&auth::generate_token())?;
    let id = db.create_user(LOCAL_DEV_EMAIL, &hash)?;
    db.get_user(id)
}

/// Authentication middleware - resolves the bearer token to a session user
///
/// Only the SHA-256 digest of the token is ever compared against storage,
/// so a database read never exposes live tokens. The resolved user is
/// attached to the request as an `AuthUser` extension.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_string);

    if let Some(token) = token {
        let digest = auth::token_digest(&token);
        match state.db.session_user(&digest) {
            Ok(Some(user)) => {
                request.extensions_mut().insert(AuthUser(user));
                return next.run(request).await;
            }
            Ok(None) => {
                warn!(path = %request.uri().path(), "Rejected invalid or expired session token");
            }
            Err(e) => {
                error!(error = %e, "Session lookup failed");
                return AppError::internal("Session lookup failed").into_response();
            }
        }
    }

    // Local development: no token required, requests act as a fixed dev user
    if !state.config.require_auth {
        match local_dev_user(&state.db) {
            Ok(user) => {
                request.extensions_mut().insert(AuthUser(user));
                return next.run(request).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to resolve local-dev user");
                return AppError::internal("Failed to resolve local-dev user").into_response();
            }
        }
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid session");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        events: SessionEvents::new(),
    });

    // Sign-up and sign-in are reachable without a session
    let public_routes = Router::new()
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/signin", post(handlers::signin));

    let protected_routes = Router::new()
        // Auth
        .route("/auth/signout", post(handlers::signout))
        .route("/me", get(handlers::get_me))
        // Weekly budget records
        .route(
            "/weekly/:year/:week",
            get(handlers::get_weekly).put(handlers::save_weekly),
        )
        .route("/weekly", get(handlers::list_weekly))
        // Monthly budget records
        .route(
            "/monthly/:year/:month",
            get(handlers::get_monthly).put(handlers::save_monthly),
        )
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // Security headers
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    }

    info!("Using database at {}", db.path());

    // Clean out sessions that expired while the server was down
    match db.purge_expired_sessions() {
        Ok(count) if count > 0 => {
            info!("Purged {} expired session(s)", count);
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Failed to purge expired sessions: {}", e);
        }
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
