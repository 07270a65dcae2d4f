use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::tugas::{
    error::ApiError,
    handlers::internal,
    store::{PublicUser, UserRepository},
    token::{self, TokenService},
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// Response for a successful registration or login: the bearer token plus
/// the user without its password hash.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[utoipa::path(
    post,
    path= "/api/auth/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "User registered, returns bearer token", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered"),
    ),
    tag= "auth"
)]
#[instrument(skip(users, tokens, payload))]
pub async fn register(
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(tokens): Extension<Arc<TokenService>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::BadInput("Missing payload".to_string()));
    };

    let (name, email, password) = match (payload.name, payload.email, payload.password) {
        (Some(name), Some(email), Some(password))
            if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            (name, email, password)
        }
        _ => {
            return Err(ApiError::BadInput(
                "Name, email, and password are required.".to_string(),
            ))
        }
    };

    if password.chars().count() < 6 {
        return Err(ApiError::BadInput(
            "Password must be at least 6 characters.".to_string(),
        ));
    }

    // check if user exists
    if users
        .find_by_email(&email)
        .await
        .map_err(internal)?
        .is_some()
    {
        debug!("Registration refused, email already taken");
        return Err(ApiError::Conflict("Email already registered.".to_string()));
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST).map_err(internal)?;

    let user = users
        .create(&name, &email, &password_hash)
        .await
        .map_err(internal)?;

    let token = tokens
        .issue(&user.id, &user.email, token::default_ttl())
        .map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            token,
            user: user.into(),
        }),
    ))
}
