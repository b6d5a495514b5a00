//! In-memory implementation of the repository traits.
//!
//! Deterministic and test-friendly. Each write takes a single lock, so the
//! username uniqueness check and the insert are one atomic step.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TaskRepository, UserRepository};
use crate::models::{Task, User};

#[derive(Default)]
struct Users {
    next_id: i32,
    by_id: HashMap<i32, User>,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Users>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops an identity and its tasks. Accounts cannot be deleted over the API;
    /// this exists so tests can simulate an account vanishing after token issuance.
    pub fn remove_user(&self, id: i32) -> StoreResult<bool> {
        let removed = self
            .users
            .write()
            .map_err(|_| poisoned("users"))?
            .by_id
            .remove(&id)
            .is_some();
        self.tasks
            .write()
            .map_err(|_| poisoned("tasks"))?
            .retain(|_, task| task.user_id != id);
        Ok(removed)
    }
}

fn poisoned(what: &str) -> StoreError {
    StoreError::Backend(format!("{} lock poisoned", what))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.write().map_err(|_| poisoned("users"))?;
        if users.by_id.values().any(|u| u.username == username) {
            return Err(StoreError::Conflict(format!(
                "username {} already exists",
                username
            )));
        }
        users.next_id += 1;
        let user = User {
            id: users.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| poisoned("users"))?;
        Ok(users
            .by_id
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| poisoned("users"))?;
        Ok(users.by_id.get(&id).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn list_tasks(&self, user_id: i32) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(|_| poisoned("tasks"))?;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().map_err(|_| poisoned("tasks"))?;
        if tasks.contains_key(&task.id) {
            return Err(StoreError::Conflict(format!("task {} already exists", task.id)));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(|_| poisoned("tasks"))?;
        Ok(tasks.get(&id).cloned())
    }

    async fn update_task(&self, task: Task) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().map_err(|_| poisoned("tasks"))?;
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(task)
            }
            None => Err(StoreError::Backend(format!("task {} vanished during update", task.id))),
        }
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().map_err(|_| poisoned("tasks"))?;
        Ok(tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_ids_are_unique_and_usernames_exclusive() {
        let store = InMemoryStore::new();
        let alice = store.insert_user("alice", "h1").await.unwrap();
        let bob = store.insert_user("bob", "h2").await.unwrap();
        assert_ne!(alice.id, bob.id);

        let dup = store.insert_user("alice", "h3").await;
        assert!(matches!(dup, Err(StoreError::Conflict(_))));

        // The first registration is untouched by the rejected one.
        let stored = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored, alice);
    }

    #[actix_rt::test]
    async fn test_concurrent_registrations_yield_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert_user("racer", &format!("hash{}", i)).await
            }));
        }
        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[actix_rt::test]
    async fn test_remove_user_drops_their_tasks() {
        let store = InMemoryStore::new();
        let user = store.insert_user("carol", "h").await.unwrap();
        let task = Task::new("t".into(), None, TaskStatus::Pending, user.id);
        store.insert_task(task.clone()).await.unwrap();

        assert!(store.remove_user(user.id).unwrap());
        assert!(store.find_user_by_id(user.id).await.unwrap().is_none());
        assert!(store.find_task(task.id).await.unwrap().is_none());
        assert!(!store.remove_user(user.id).unwrap());
    }

    #[actix_rt::test]
    async fn test_list_tasks_is_scoped_and_newest_first() {
        let store = InMemoryStore::new();
        let mut first = Task::new("first".into(), None, TaskStatus::Pending, 1);
        first.created_at -= chrono::Duration::seconds(10);
        let second = Task::new("second".into(), None, TaskStatus::Pending, 1);
        let foreign = Task::new("foreign".into(), None, TaskStatus::Pending, 2);
        for task in [first, second, foreign] {
            store.insert_task(task).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_tasks(1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["second".to_string(), "first".to_string()]);
    }
}
