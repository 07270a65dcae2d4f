//! Bearer-token authentication middleware for the `/api/lists` routes.

use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::cli::globals::GlobalArgs;
use crate::tugas::{error::ApiError, token::TokenService};

/// Placeholder identity used in anonymous development mode.
pub const DEV_USER_ID: &str = "dummy-user-id";

/// The resolved requester identity, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: String,
    pub email: Option<String>,
}

impl Principal {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: DEV_USER_ID.to_string(),
            email: None,
        }
    }
}

/// Resolve the requester identity and pass it downstream.
///
/// A missing `Authorization` header is a 401 ("Missing token") unless
/// anonymous development mode is enabled, in which case the request runs
/// under the placeholder identity. A header that is present but carries a
/// bad scheme, a malformed token, an expired token, or a token signed with
/// a different secret is always a 401 ("Invalid token"). The message text
/// is the only distinction between the two failures.
pub async fn auth(
    Extension(tokens): Extension<Arc<TokenService>>,
    Extension(globals): Extension<GlobalArgs>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        if globals.allow_anonymous {
            req.extensions_mut().insert(Principal::placeholder());
            return Ok(next.run(req).await);
        }
        return Err(ApiError::Unauthorized("Missing token".to_string()));
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    let claims = tokens.verify(token.trim()).map_err(|err| {
        debug!("Token verification failed: {err}");
        ApiError::Unauthorized("Invalid token".to_string())
    })?;

    req.extensions_mut().insert(Principal {
        id: claims.sub,
        email: Some(claims.email),
    });

    Ok(next.run(req).await)
}
