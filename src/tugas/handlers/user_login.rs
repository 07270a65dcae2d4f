use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::tugas::{
    error::ApiError,
    handlers::{internal, user_register::AuthResponse},
    store::UserRepository,
    token::{self, TokenService},
};

// The unknown-email and wrong-password branches answer with this exact same
// message so callers cannot enumerate registered emails.
const LOGIN_FAILED: &str = "Email or password incorrect.";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path= "/api/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login success, returns bearer token", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Email or password incorrect"),
    ),
    tag= "auth"
)]
#[instrument(skip(users, tokens, payload))]
pub async fn login(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(tokens): Extension<Arc<TokenService>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::BadInput("Missing payload".to_string()));
    };

    let (email, password) = match (payload.email, payload.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(ApiError::BadInput(
                "Email and password are required.".to_string(),
            ))
        }
    };

    let Some(user) = users.find_by_email(&email).await.map_err(internal)? else {
        debug!("Login failed, unknown email");
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    };

    let password_matches = bcrypt::verify(&password, &user.password_hash).map_err(internal)?;
    if !password_matches {
        debug!("Login failed, password mismatch");
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    let token = tokens
        .issue(&user.id, &user.email, token::default_ttl())
        .map_err(internal)?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: user.into(),
        }),
    ))
}
