//! Demo data seeding
//!
//! Inserts one demo user with a handful of tasks so a fresh database has
//! something to look at. Enabled by `SEED_DEMO_DATA=true`.

use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, User};
use crate::store::{Store, StoreResult};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Names the demo tasks are drawn from
pub const DEMO_TASK_NAMES: [&str; 5] = [
    "Take out the trash",
    "Do laundry",
    "Buy groceries",
    "Clean the house",
    "Pay bills",
];

const DEMO_STATUSES: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::Complete];

/// Demo records to insert, generated up front
#[derive(Debug, Clone)]
pub struct DemoPlan {
    /// The demo user
    pub user: CreateUser,

    /// Tasks for the demo user; `user_id` is filled in on insert
    pub tasks: Vec<CreateTask>,
}

/// What the seeder inserted
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// The created user
    pub user: User,

    /// The created tasks
    pub tasks: Vec<Task>,
}

/// Generates a demo user `nik_<6 digits>` with 2 to 5 tasks
///
/// Every task is scheduled at `now` and due at a random point within the
/// next 7 days.
pub fn plan_demo_data<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DemoPlan {
    let suffix: u32 = rng.gen_range(100_000..=999_999);
    let user = CreateUser {
        username: format!("nik_{}", suffix),
        first_name: "Nik".to_string(),
        last_name: "Spyratos".to_string(),
    };

    let count = rng.gen_range(2..=5);
    let week_ms = Duration::days(7).num_milliseconds();

    let tasks = (0..count)
        .map(|_| CreateTask {
            user_id: 0,
            status: DEMO_STATUSES.choose(rng).copied().unwrap_or_default(),
            name: DEMO_TASK_NAMES
                .choose(rng)
                .copied()
                .unwrap_or(DEMO_TASK_NAMES[0])
                .to_string(),
            description: None,
            date_time: now,
            next_execute_date_time: Some(now + Duration::milliseconds(rng.gen_range(0..week_ms))),
        })
        .collect();

    DemoPlan { user, tasks }
}

/// Inserts a freshly generated demo plan through `store`
///
/// # Errors
///
/// Returns the first store error; a user inserted before a failing task is
/// left in place.
pub async fn seed_demo_data(store: &dyn Store) -> StoreResult<SeedReport> {
    let plan = plan_demo_data(&mut rand::thread_rng(), Utc::now());
    insert_plan(store, plan).await
}

/// Inserts a previously generated plan
pub async fn insert_plan(store: &dyn Store, plan: DemoPlan) -> StoreResult<SeedReport> {
    let user = store.create_user(plan.user).await?;

    let mut tasks = Vec::with_capacity(plan.tasks.len());
    for mut task in plan.tasks {
        task.user_id = user.id;
        tasks.push(store.create_task(task).await?);
    }

    info!(
        user_id = user.id,
        username = %user.username,
        task_count = tasks.len(),
        "Seeded demo data"
    );

    Ok(SeedReport { user, tasks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plan_demo_data_shape() {
        let now = Utc::now();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = plan_demo_data(&mut rng, now);

            let suffix = plan.user.username.strip_prefix("nik_").unwrap();
            assert_eq!(suffix.len(), 6);
            assert!(suffix.parse::<u32>().is_ok());

            assert!((2..=5).contains(&plan.tasks.len()));
            for task in &plan.tasks {
                assert!(DEMO_TASK_NAMES.contains(&task.name.as_str()));
                assert_eq!(task.date_time, now);
                let due = task.next_execute_date_time.unwrap();
                assert!(due >= now && due < now + Duration::days(7));
            }
        }
    }

    #[tokio::test]
    async fn test_seed_demo_data_inserts_user_and_tasks() {
        let store = InMemoryStore::new();

        let report = seed_demo_data(&store).await.unwrap();

        assert_eq!(store.task_count().await, report.tasks.len());
        assert!(report.tasks.iter().all(|t| t.user_id == report.user.id));
        assert!(report
            .tasks
            .iter()
            .all(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::Complete)));
    }
}
