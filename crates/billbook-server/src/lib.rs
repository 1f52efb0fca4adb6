//! Billbook Web Server
//!
//! Axum-based JSON API for the Billbook utility-bill tracker.
//!
//! Security features:
//! - Argon2 password hashing for signup/login
//! - Per-user bill ownership checks on every bill route
//! - Restrictive CORS policy
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use billbook_core::db::Database;

mod handlers;

/// Maximum JSON request body size (16 KB)
pub const MAX_BODY_SIZE: usize = 16 * 1024;

/// Environment variable for comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "BILLBOOK_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let cors = build_cors(&config);
    let state = Arc::new(AppState { db, config });

    let api_routes = Router::new()
        // Accounts
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        // Reference data
        .route("/categories", get(handlers::list_categories))
        // Dashboard
        .route("/users/:user_id/dashboard", get(handlers::get_dashboard))
        // Bills
        .route(
            "/users/:user_id/bills/:category",
            get(handlers::list_bills).post(handlers::create_bill),
        )
        .route(
            "/users/:user_id/bills/:category/filter",
            get(handlers::filter_bills),
        )
        .route(
            "/users/:user_id/bills/:category/:id",
            get(handlers::get_bill)
                .put(handlers::update_bill)
                .delete(handlers::delete_bill),
        )
        // Charts
        .route("/users/:user_id/chart/:category", get(handlers::get_chart))
        .route(
            "/users/:user_id/chart/:category/png",
            get(handlers::get_chart_png),
        )
        // Export
        .route("/users/:user_id/export.csv", get(handlers::export_csv))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    // CSP: same-origin scripts, inline styles, data/blob images for charts
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; connect-src 'self'; frame-ancestors 'none'",
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

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        return cors;
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.allowed_origins.is_empty() {
        info!("CORS origins: {}", config.allowed_origins.join(", "));
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
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
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
        use billbook_core::Error as CoreError;

        let err = err.into();
        let mapped = match err.downcast_ref::<CoreError>() {
            Some(e) if e.is_user_error() => Some(Self::bad_request(&e.to_string())),
            Some(e @ CoreError::NotFound(_)) => Some(Self::not_found(&e.to_string())),
            Some(e @ CoreError::UsernameTaken(_)) => Some(Self::conflict(&e.to_string())),
            Some(e @ CoreError::InvalidCredentials) => Some(Self::unauthorized(&e.to_string())),
            _ => None,
        };

        mapped.unwrap_or_else(|| Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        })
    }
}

#[cfg(test)]
mod tests;
