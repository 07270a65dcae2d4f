//! In-memory repositories: append-only vectors behind a mutex.
//!
//! The mutex makes each store method atomic under parallel handler
//! execution. Check-then-write sequences (email uniqueness, ownership
//! checks) span two calls and are not serialized; the narrow window where
//! two concurrent registrations race is an accepted limitation.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ListRepository, StoreError, TodoList, User, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };

        self.users.lock().await.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().await.clone())
    }
}

#[derive(Default)]
pub struct MemoryListRepository {
    lists: Mutex<Vec<TodoList>>,
}

#[async_trait]
impl ListRepository for MemoryListRepository {
    async fn create(
        &self,
        owner_id: &str,
        title: &str,
        description: Option<String>,
    ) -> Result<TodoList, StoreError> {
        let now = Utc::now();
        let list = TodoList {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            title: title.to_string(),
            description,
            created_at: now,
            updated_at: now,
        };

        self.lists.lock().await.push(list.clone());

        Ok(list)
    }

    async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<TodoList>, StoreError> {
        let lists = self.lists.lock().await;
        Ok(lists
            .iter()
            .filter(|list| list.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TodoList>, StoreError> {
        let lists = self.lists.lock().await;
        Ok(lists.iter().find(|list| list.id == id).cloned())
    }

    async fn update(&self, list: TodoList) -> Result<TodoList, StoreError> {
        let mut lists = self.lists.lock().await;
        let entry = lists
            .iter_mut()
            .find(|stored| stored.id == list.id)
            .ok_or(StoreError::NotFound)?;

        // id, owner and created_at stay as stored
        entry.title = list.title;
        entry.description = list.description;
        entry.updated_at = Utc::now();

        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut lists = self.lists.lock().await;
        lists.retain(|list| list.id != id);
        Ok(())
    }
}
