use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

use crate::tugas::{
    error::ApiError,
    handlers::internal,
    store::{User, UserRepository},
};

#[utoipa::path(
    get,
    path= "/api/auth/users",
    responses (
        (status = 200, description = "All registered users, including password hashes (development only)", body = [User]),
    ),
    tag= "auth"
)]
/// Unscoped user dump for development; includes password hashes and must
/// never be exposed in production.
#[instrument(skip(users))]
pub async fn list_users(
    Extension(users): Extension<Arc<dyn UserRepository>>,
) -> Result<impl IntoResponse, ApiError> {
    let all = users.list_all().await.map_err(internal)?;
    Ok(Json(all))
}
