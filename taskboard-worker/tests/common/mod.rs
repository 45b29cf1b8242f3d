//! Shared fixtures for worker integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use taskboard_shared::models::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::store::memory::InMemoryStore;
use taskboard_shared::store::{StoreError, StoreResult, TaskStore, UserStore};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub async fn create_user(store: &InMemoryStore, username: &str) -> User {
    store
        .create_user(CreateUser {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        })
        .await
        .unwrap()
}

pub async fn create_task(
    store: &InMemoryStore,
    user_id: i64,
    status: TaskStatus,
    due: Option<DateTime<Utc>>,
) -> Task {
    store
        .create_task(CreateTask {
            user_id,
            status,
            name: "Take out the trash".to_string(),
            description: None,
            date_time: Utc::now() - Duration::days(1),
            next_execute_date_time: due,
        })
        .await
        .unwrap()
}

/// Task store that delegates to an [`InMemoryStore`] and can be told to fail
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    fail_queries: AtomicBool,
    race_completions: AtomicBool,
    failing_completions: Mutex<HashSet<i64>>,
    completion_delay: Mutex<Option<std::time::Duration>>,
    completion_calls: Mutex<Vec<i64>>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Makes every completion lose a race against a concurrent update
    pub fn race_completions(&self, race: bool) {
        self.race_completions.store(race, Ordering::SeqCst);
    }

    pub fn fail_completion_of(&self, task_id: i64) {
        self.failing_completions.lock().unwrap().insert(task_id);
    }

    pub fn delay_completions(&self, delay: std::time::Duration) {
        *self.completion_delay.lock().unwrap() = Some(delay);
    }

    /// Task IDs passed to `complete_task`, in call order
    pub fn completion_calls(&self) -> Vec<i64> {
        self.completion_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        self.inner.create_task(data).await
    }

    async fn find_task(&self, user_id: i64, task_id: i64) -> StoreResult<Option<Task>> {
        self.inner.find_task(user_id, task_id).await
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.find_tasks(filter).await
    }

    async fn update_task(
        &self,
        user_id: i64,
        task_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        self.inner.update_task(user_id, task_id, data).await
    }

    async fn complete_task(&self, task_id: i64) -> StoreResult<Option<Task>> {
        self.completion_calls.lock().unwrap().push(task_id);

        let delay = *self.completion_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_completions.lock().unwrap().contains(&task_id) {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        if self.race_completions.load(Ordering::SeqCst) {
            self.inner.complete_task(task_id).await?;
        }
        self.inner.complete_task(task_id).await
    }

    async fn delete_task(&self, user_id: i64, task_id: i64) -> StoreResult<bool> {
        self.inner.delete_task(user_id, task_id).await
    }
}

/// One captured `tracing` event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggedEvent {
    pub message: String,
    pub task_id: Option<i64>,
    pub task_name: Option<String>,
}

impl Visit for LoggedEvent {
    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "task_id" {
            self.task_id = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "task_name" => self.task_name = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "task_name" => self.task_name = Some(format!("{:?}", value)),
            _ => {}
        }
    }
}

/// Collects events emitted on the current thread while installed
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<LoggedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the capture as the thread's default subscriber until the guard drops
    pub fn set_default(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// Captured events whose message equals `message`
    pub fn with_message(&self, message: &str) -> Vec<LoggedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }

    /// Captured messages starting with `prefix`, in emission order
    pub fn messages_starting_with(&self, prefix: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.message.starts_with(prefix))
            .map(|e| e.message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut logged = LoggedEvent::default();
        event.record(&mut logged);
        self.events.lock().unwrap().push(logged);
    }
}
