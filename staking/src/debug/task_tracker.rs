//! Async task lifecycle tracking for debugging hung workflows

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Number of tracked tasks currently running
static ACTIVE_TASKS: AtomicU64 = AtomicU64::new(0);

/// Monotonic id source for spawned tasks
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

/// Tasks running longer than this are reported as potential hangs
const SLOW_TASK_SECS: u64 = 30;

/// Get current number of active tracked tasks
pub fn active_task_count() -> u64 {
    ACTIVE_TASKS.load(Ordering::Relaxed)
}

/// Decrements the active count even if the task panics or is aborted.
struct ActiveTask;

impl Drop for ActiveTask {
    fn drop(&mut self) {
        ACTIVE_TASKS.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Spawn an instrumented async task with lifecycle tracking
///
/// # Arguments
///
/// * `name` - Task name for logging (e.g., "deposit", "withdraw")
/// * `future` - The async task to execute
///
/// # Returns
///
/// JoinHandle that can be awaited or detached. Dropping the handle does not
/// cancel the task.
///
/// # Example
///
/// ```rust,ignore
/// let handle = spawn_tracked("deposit", tasks::stake::deposit(state, prepared, amount, None));
/// let outcome = handle.await?;
/// ```
pub fn spawn_tracked<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    ACTIVE_TASKS.fetch_add(1, Ordering::Relaxed);
    let start = Instant::now();

    tracing::debug!(
        task = %name,
        task_id = task_id,
        "Task spawned"
    );

    tokio::spawn(async move {
        let _active = ActiveTask;
        let result = future.await;
        let duration = start.elapsed();

        tracing::debug!(
            task = %name,
            task_id = task_id,
            duration_ms = duration.as_millis() as u64,
            "Task completed"
        );

        if duration.as_secs() > SLOW_TASK_SECS {
            tracing::warn!(
                task = %name,
                task_id = task_id,
                duration_ms = duration.as_millis() as u64,
                "Task took very long (potential hang)"
            );
        }

        result
    })
}
