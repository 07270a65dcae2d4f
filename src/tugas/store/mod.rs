//! Repository abstraction for users and lists.
//!
//! Both stores are capability traits with swappable backings: the in-memory
//! implementations are the default, and the user store can alternatively be
//! backed by PostgreSQL (`--dsn`). Per-user scoping of lists is enforced by
//! the handlers, not here; the stores only promise exact-match lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub mod memory;
pub mod postgres;

pub use memory::{MemoryListRepository, MemoryUserRepository};
pub use postgres::PgUserRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A registered account. The password hash is opaque to everything except
/// the auth flow and is only ever serialized by the debug user listing.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// The user fields safe to return to clients.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// A to-do list owned by a single user.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: String,
    /// Weak reference to the owning [`User`]: deleting a user does not
    /// cascade, orphaned lists are tolerated.
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential store contract.
///
/// `create` performs no uniqueness check; the registration flow is
/// responsible for checking the email first.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    /// Exact, case-sensitive match. An empty email yields `None`, never an
    /// error.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Unscoped listing. Callers must treat the result as sensitive,
    /// debug-only data (it includes password hashes).
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}

/// Resource store contract for lists.
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn create(
        &self,
        owner_id: &str,
        title: &str,
        description: Option<String>,
    ) -> Result<TodoList, StoreError>;

    /// All lists owned by `owner_id`, in insertion order. An empty owner id
    /// yields an empty vector, never an error.
    async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<TodoList>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<TodoList>, StoreError>;

    /// Replace title/description of the stored record and refresh
    /// `updated_at`; id, owner and `created_at` are preserved.
    /// Fails with [`StoreError::NotFound`] for an unknown id.
    async fn update(&self, list: TodoList) -> Result<TodoList, StoreError>;

    /// Deleting an unknown or empty id is a silent no-op.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
