/// In-memory store
///
/// A process-local implementation of the repository traits with the same
/// observable semantics as [`super::postgres::PgStore`]: system-assigned
/// increasing IDs, unique usernames, owner foreign keys, ID ordering and the
/// pending-guarded completion update. Used by tests and local development.

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

impl MemoryState {
    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }
}

/// Store backed by in-process maps
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    /// Snapshot of every stored task, ordered by ID
    pub async fn all_tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.values().cloned().collect()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.username_taken(&data.username, None) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            username: data.username,
            first_name: data.first_name,
            last_name: data.last_name,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut state = self.state.write().await;

        if let Some(username) = data.username.as_deref() {
            if state.username_taken(username, Some(id)) {
                return Err(StoreError::Conflict("Username already exists".to_string()));
            }
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = data.username {
            user.username = username;
        }
        if let Some(first_name) = data.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&data.user_id) {
            return Err(StoreError::InvalidReference(format!(
                "user {} does not exist",
                data.user_id
            )));
        }

        state.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: state.last_task_id,
            user_id: data.user_id,
            status: data.status,
            name: data.name,
            description: data.description,
            date_time: data.date_time,
            next_execute_date_time: data.next_execute_date_time,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn find_task(&self, user_id: i64, task_id: i64) -> StoreResult<Option<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .get(&task_id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn update_task(
        &self,
        user_id: i64,
        task_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;

        let Some(task) = state
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(status) = data.status {
            if !task.status.can_transition_to(status) {
                return Err(StoreError::InvalidTransition {
                    from: task.status,
                    to: status,
                });
            }
            task.status = status;
        }
        if let Some(name) = data.name {
            task.name = name;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(date_time) = data.date_time {
            task.date_time = date_time;
        }
        if let Some(next_execute) = data.next_execute_date_time {
            task.next_execute_date_time = next_execute;
        }
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn complete_task(&self, task_id: i64) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;

        let Some(task) = state
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.status == TaskStatus::Pending)
        else {
            return Ok(None);
        };

        task.status = TaskStatus::Complete;
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, user_id: i64, task_id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        let owned = state
            .tasks
            .get(&task_id)
            .is_some_and(|t| t.user_id == user_id);
        if owned {
            state.tasks.remove(&task_id);
        }

        Ok(owned)
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
