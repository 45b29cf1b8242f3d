/// Periodic sweep scheduler
///
/// Runs [`DueDateSweeper::sweep`] on a background tokio task at a fixed
/// period. The first sweep happens one period after [`SweepScheduler::start`].
///
/// # Lifecycle
///
/// ```text
/// SweepScheduler::start() ──> SchedulerHandle ──stop().await──> stopped
/// ```
///
/// A pass always runs to completion before the next tick is awaited, so
/// sweeps never overlap. Ticks missed while a pass runs long are delayed,
/// not burst. [`SchedulerHandle::stop`] prevents further sweeps and waits
/// for an in-flight sweep instead of aborting it.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use taskboard_shared::store::memory::InMemoryStore;
/// use taskboard_worker::scheduler::SweepScheduler;
/// use taskboard_worker::sweeper::DueDateSweeper;
///
/// # async fn example() {
/// let sweeper = DueDateSweeper::with_system_clock(Arc::new(InMemoryStore::new()));
/// let handle = SweepScheduler::new(sweeper, Duration::from_secs(60)).start();
///
/// // ... serve requests ...
///
/// handle.stop().await;
/// # }
/// ```

use crate::config::SweeperConfig;
use crate::sweeper::DueDateSweeper;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Not yet started sweep scheduler
pub struct SweepScheduler {
    sweeper: DueDateSweeper,
    period: Duration,
}

impl SweepScheduler {
    /// Creates a scheduler sweeping every `period`
    ///
    /// A zero period is raised to one millisecond.
    pub fn new(sweeper: DueDateSweeper, period: Duration) -> Self {
        Self {
            sweeper,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Creates a scheduler with the configured interval
    pub fn from_config(sweeper: DueDateSweeper, config: &SweeperConfig) -> Self {
        Self::new(sweeper, config.interval)
    }

    /// Time between sweeps
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawns the periodic loop on the current tokio runtime
    pub fn start(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let passes = Arc::new(AtomicU64::new(0));

        tracing::info!(period_secs = self.period.as_secs_f64(), "Starting due-date sweeper");

        let join = tokio::spawn(run_loop(
            self.sweeper,
            self.period,
            token.clone(),
            passes.clone(),
        ));

        SchedulerHandle {
            token,
            join,
            passes,
        }
    }
}

async fn run_loop(
    sweeper: DueDateSweeper,
    period: Duration,
    token: CancellationToken,
    passes: Arc<AtomicU64>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // Not raced against cancellation: a started pass always finishes
        if let Err(e) = sweeper.sweep().await {
            tracing::error!(error = %e, "Due-date sweep failed");
        }
        passes.fetch_add(1, Ordering::Relaxed);
    }

    tracing::info!("Due-date sweeper stopped");
}

/// Handle to a running scheduler
pub struct SchedulerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
    passes: Arc<AtomicU64>,
}

impl SchedulerHandle {
    /// Whether the background loop is still alive
    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }

    /// Number of sweeps finished so far, including failed ones
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Stops the scheduler, waiting for an in-flight sweep to finish
    pub async fn stop(self) {
        tracing::info!("Stopping due-date sweeper");
        self.token.cancel();

        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "Due-date sweeper task ended abnormally");
        }
    }
}
