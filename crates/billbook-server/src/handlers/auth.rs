//! Signup and login handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use super::parse_json;
use crate::{AppError, AppState};
use billbook_core::models::User;

/// Request body for signup and login
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/signup - Register a new user
pub async fn signup(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), AppError> {
    let req: CredentialsRequest = parse_json(&body)?;
    let user = state.db.register_user(&req.username, &req.password)?;

    info!(user_id = user.id, "Signup");
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/login - Check credentials and return the user
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<User>, AppError> {
    let req: CredentialsRequest = parse_json(&body)?;
    let user = state.db.authenticate(&req.username, &req.password)?;

    info!(user_id = user.id, "Login");
    Ok(Json(user))
}
