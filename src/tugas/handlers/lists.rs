//! CRUD handlers for list resources, owner-scoped.
//!
//! Absent resources and foreign-owned resources are both reported as
//! `404 List not found` so non-owners cannot probe for existence.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::tugas::{
    auth::Principal,
    error::{ApiError, ApiMessage},
    handlers::internal,
    store::{ListRepository, StoreError, TodoList},
};

const LIST_NOT_FOUND: &str = "List not found";

/// Body for list create and update requests.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ListRequest {
    title: Option<String>,
    description: Option<String>,
}

fn require_title(title: Option<String>) -> Result<String, ApiError> {
    match title {
        Some(title) if !title.is_empty() => Ok(title),
        _ => Err(ApiError::BadInput("Title is required".to_string())),
    }
}

/// Fetch a list and check it belongs to the requester. Absence and wrong
/// ownership are deliberately the same outcome.
async fn find_owned(
    lists: &Arc<dyn ListRepository>,
    id: &str,
    requester: &Principal,
) -> Result<TodoList, ApiError> {
    match lists.find_by_id(id).await.map_err(internal)? {
        Some(list) if list.user_id == requester.id => Ok(list),
        _ => Err(ApiError::NotFound(LIST_NOT_FOUND.to_string())),
    }
}

#[utoipa::path(
    post,
    path= "/api/lists",
    request_body = ListRequest,
    security(("bearerAuth" = [])),
    responses (
        (status = 201, description = "List created", body = TodoList),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
    ),
    tag= "lists"
)]
#[instrument(skip(lists, payload))]
pub async fn create_list(
    Extension(lists): Extension<Arc<dyn ListRepository>>,
    Extension(principal): Extension<Principal>,
    payload: Option<Json<ListRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::BadInput("Missing payload".to_string()));
    };

    let title = require_title(payload.title)?;

    let list = lists
        .create(&principal.id, &title, payload.description)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(list)))
}

#[utoipa::path(
    get,
    path= "/api/lists",
    security(("bearerAuth" = [])),
    responses (
        (status = 200, description = "All lists owned by the requester", body = [TodoList]),
        (status = 401, description = "Unauthorized"),
    ),
    tag= "lists"
)]
#[instrument(skip(lists))]
pub async fn get_all_lists(
    Extension(lists): Extension<Arc<dyn ListRepository>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let owned = lists
        .find_all_by_owner(&principal.id)
        .await
        .map_err(internal)?;

    Ok(Json(owned))
}

#[utoipa::path(
    get,
    path= "/api/lists/{id}",
    params(("id" = String, Path, description = "List id")),
    security(("bearerAuth" = [])),
    responses (
        (status = 200, description = "List found", body = TodoList),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "List not found"),
    ),
    tag= "lists"
)]
#[instrument(skip(lists))]
pub async fn get_list_by_id(
    Path(id): Path<String>,
    Extension(lists): Extension<Arc<dyn ListRepository>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let list = find_owned(&lists, &id, &principal).await?;

    Ok(Json(list))
}

#[utoipa::path(
    put,
    path= "/api/lists/{id}",
    params(("id" = String, Path, description = "List id")),
    request_body = ListRequest,
    security(("bearerAuth" = [])),
    responses (
        (status = 200, description = "List updated", body = TodoList),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "List not found"),
    ),
    tag= "lists"
)]
#[instrument(skip(lists, payload))]
pub async fn update_list(
    Path(id): Path<String>,
    Extension(lists): Extension<Arc<dyn ListRepository>>,
    Extension(principal): Extension<Principal>,
    payload: Option<Json<ListRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::BadInput("Missing payload".to_string()));
    };

    // Validation happens before any store access: a missing title is a 400
    // whether or not the target exists
    let title = require_title(payload.title)?;

    let existing = find_owned(&lists, &id, &principal).await?;

    let updated = lists
        .update(TodoList {
            title,
            description: payload.description,
            ..existing
        })
        .await
        .map_err(|err| match err {
            // The ownership check above already passed; a vanished record is
            // still reported as not found
            StoreError::NotFound => ApiError::NotFound(LIST_NOT_FOUND.to_string()),
            other => internal(other),
        })?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path= "/api/lists/{id}",
    params(("id" = String, Path, description = "List id")),
    security(("bearerAuth" = [])),
    responses (
        (status = 200, description = "List deleted", body = ApiMessage),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "List not found"),
    ),
    tag= "lists"
)]
#[instrument(skip(lists))]
pub async fn delete_list(
    Path(id): Path<String>,
    Extension(lists): Extension<Arc<dyn ListRepository>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    find_owned(&lists, &id, &principal).await?;

    lists.delete(&id).await.map_err(internal)?;

    Ok(Json(ApiMessage::new(format!(
        "Successfully deleted list with id {id}"
    ))))
}
