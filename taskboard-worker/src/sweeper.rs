/// Task due-date sweeper
///
/// One sweep finds every pending task whose `next_execute_date_time` is
/// before the clock's current time and completes them one at a time, in
/// ascending ID order.
///
/// # Failure Handling
///
/// - The overdue query failing ends the pass with [`SweepError::Store`].
/// - A single completion failing is logged and counted; the pass continues.
/// - A task completed or deleted between query and update is counted as
///   skipped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::clock::SystemClock;
/// use taskboard_shared::store::memory::InMemoryStore;
/// use taskboard_worker::sweeper::DueDateSweeper;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sweeper = DueDateSweeper::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock));
/// let report = sweeper.sweep().await?;
/// assert_eq!(report.completed, 0);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use taskboard_shared::clock::{Clock, SystemClock};
use taskboard_shared::models::task::TaskFilter;
use taskboard_shared::store::{StoreError, TaskStore};

/// Error that ends a sweep early
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The overdue-task query failed
    #[error("Failed to query overdue tasks: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Overdue tasks returned by the query
    pub found: usize,

    /// Tasks transitioned to complete
    pub completed: usize,

    /// Tasks no longer pending (or gone) at update time
    pub skipped: usize,

    /// Tasks whose update failed
    pub failed: usize,
}

/// Completes overdue pending tasks
pub struct DueDateSweeper {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl DueDateSweeper {
    /// Creates a sweeper over `store`, reading time from `clock`
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a sweeper that reads the wall clock
    pub fn with_system_clock(store: Arc<dyn TaskStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Runs one pass
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Store`] if the overdue query fails. Failures of
    /// individual updates are reported in [`SweepReport::failed`] instead.
    pub async fn sweep(&self) -> Result<SweepReport, SweepError> {
        let now = self.clock.now();
        let overdue = self.store.find_tasks(&TaskFilter::overdue(now)).await?;

        let mut report = SweepReport {
            found: overdue.len(),
            ..Default::default()
        };

        for task in overdue {
            tracing::info!(task_id = task.id, task_name = %task.name, "Updating task");

            match self.store.complete_task(task.id).await {
                Ok(Some(_)) => report.completed += 1,
                Ok(None) => {
                    tracing::debug!(task_id = task.id, "Task no longer pending, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(task_id = task.id, error = %e, "Failed to complete task");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            completed = report.completed,
            skipped = report.skipped,
            failed = report.failed,
            "Updated {} tasks",
            report.completed
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use taskboard_shared::clock::FixedClock;
    use taskboard_shared::models::task::{CreateTask, TaskStatus};
    use taskboard_shared::models::user::CreateUser;
    use taskboard_shared::store::memory::InMemoryStore;
    use taskboard_shared::store::UserStore;

    #[tokio::test]
    async fn test_empty_store_sweeps_nothing() {
        let sweeper = DueDateSweeper::with_system_clock(Arc::new(InMemoryStore::new()));

        let report = sweeper.sweep().await.unwrap();
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn test_sweep_uses_injected_clock() {
        let store = Arc::new(InMemoryStore::new());
        let now = Utc::now();
        let clock = Arc::new(FixedClock::new(now));

        let user = store
            .create_user(CreateUser {
                username: "clock".to_string(),
                first_name: "C".to_string(),
                last_name: "K".to_string(),
            })
            .await
            .unwrap();
        store
            .create_task(CreateTask {
                user_id: user.id,
                status: TaskStatus::Pending,
                name: "Pay bills".to_string(),
                description: None,
                date_time: now,
                next_execute_date_time: Some(now + Duration::minutes(30)),
            })
            .await
            .unwrap();

        let sweeper = DueDateSweeper::new(store.clone(), clock.clone());
        assert_eq!(sweeper.sweep().await.unwrap().completed, 0);

        clock.advance(Duration::hours(1));
        assert_eq!(sweeper.sweep().await.unwrap().completed, 1);
    }

    #[test]
    fn test_sweep_error_display() {
        let err = SweepError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(
            err.to_string(),
            "Failed to query overdue tasks: Store unavailable: connection refused"
        );
    }
}
