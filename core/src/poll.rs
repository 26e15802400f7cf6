//! Caller-level polling loop on top of `TaskTracker`.
//!
//! The server defines no cadence, so `PollPolicy` makes both the interval and
//! the overall wait explicit. The loop stops at the first terminal snapshot
//! and never reads the task again afterwards. A task that ends in `Failure`
//! is returned as a handle, not as an error: the status reads succeeded.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::tasks::{TaskHandle, TaskState, TaskTracker};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two status reads.
    pub interval: Duration,
    /// Give up after this long. `None` waits forever.
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: Some(DEFAULT_MAX_WAIT),
        }
    }
}

impl PollPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    /// A status read failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No terminal snapshot within `max_wait`.
    #[error("task {task_id} did not finish within {}s (last state {last_state:?})", .waited.as_secs())]
    TimedOut {
        task_id: String,
        waited: Duration,
        last_state: TaskState,
    },
}

/// Poll `task_id` until it reaches `Success` or `Failure`.
///
/// `on_update` sees every snapshot, including the terminal one.
pub async fn wait_for_task(
    tracker: &TaskTracker,
    task_id: &str,
    policy: &PollPolicy,
    mut on_update: impl FnMut(&TaskHandle),
) -> Result<TaskHandle, WaitError> {
    let started = Instant::now();
    let mut last_state = None;
    let mut polls = 0u32;

    loop {
        let handle = tracker.get_status(task_id).await?;
        polls += 1;
        let state = handle.state();
        if last_state != Some(state) {
            debug!(task_id, from = ?last_state, to = ?state, "task state changed");
            last_state = Some(state);
        }
        on_update(&handle);

        if state.is_terminal() {
            info!(task_id, ?state, polls, elapsed_ms = started.elapsed().as_millis() as u64, "task finished");
            return Ok(handle);
        }

        let waited = started.elapsed();
        if let Some(max_wait) = policy.max_wait {
            let next = waited.checked_add(policy.interval);
            if next.map_or(true, |next| next > max_wait) {
                warn!(task_id, ?state, polls, "gave up waiting for task");
                return Err(WaitError::TimedOut {
                    task_id: task_id.to_string(),
                    waited,
                    last_state: state,
                });
            }
        }
        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::client::ApiClient;
    use crate::config::ClientConfig;
    use crate::tasks::TaskProgress;
    use crate::transport::fake::{self, FakeTransport};

    fn tracker(transport: FakeTransport) -> (TaskTracker, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let client = ApiClient::with_transport(ClientConfig::new("http://h"), transport.clone());
        (TaskTracker::new(client), transport)
    }

    fn fast() -> PollPolicy {
        PollPolicy::default().with_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn stops_exactly_at_success() {
        let (tracker, transport) = tracker(FakeTransport::queue(vec![
            fake::json(200, json!({"task_id": "t-123", "state": "PENDING"})),
            fake::json(200, json!({"task_id": "t-123", "state": "PROGRESS", "current": 2, "total": 5})),
            fake::json(200, json!({"task_id": "t-123", "state": "SUCCESS", "result": {"script_ids": ["s1"]}})),
            fake::json(200, json!({"task_id": "t-123", "state": "PROGRESS"})),
        ]));

        let mut seen = Vec::new();
        let done = wait_for_task(&tracker, "t-123", &fast(), |h| seen.push((h.state(), h.progress())))
            .await
            .unwrap();

        assert_eq!(done.result(), Some(&json!({"script_ids": ["s1"]})));
        assert_eq!(
            seen,
            vec![
                (TaskState::Pending, None),
                (TaskState::Progress, Some(TaskProgress { current: 2, total: 5 })),
                (TaskState::Success, None),
            ]
        );
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn failure_is_returned_as_a_handle() {
        let (tracker, transport) = tracker(FakeTransport::queue(vec![
            fake::json(200, json!({"task_id": "t-9", "state": "PROGRESS"})),
            fake::json(200, json!({"task_id": "t-9", "state": "FAILURE", "error": "hotspot not found"})),
        ]));

        let done = wait_for_task(&tracker, "t-9", &fast(), |_| {}).await.unwrap();
        assert_eq!(done.state(), TaskState::Failure);
        assert_eq!(done.error(), Some("hotspot not found"));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn status_read_failure_ends_the_loop() {
        let (tracker, _) = tracker(FakeTransport::queue(vec![fake::json(404, json!({"detail": "no such task"}))]));

        let err = wait_for_task(&tracker, "gone", &fast(), |_| {}).await.unwrap_err();
        match err {
            WaitError::Api(api) => assert_eq!(api.message(), "no such task"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn gives_up_after_max_wait() {
        let (tracker, transport) = tracker(FakeTransport::new(|_, _| {
            fake::json(200, json!({"task_id": "t-slow", "state": "PENDING"}))
        }));
        let policy = PollPolicy::default()
            .with_interval(Duration::from_millis(5))
            .with_max_wait(Some(Duration::from_millis(20)));

        let err = wait_for_task(&tracker, "t-slow", &policy, |_| {}).await.unwrap_err();
        match err {
            WaitError::TimedOut { task_id, last_state, .. } => {
                assert_eq!(task_id, "t-slow");
                assert_eq!(last_state, TaskState::Pending);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!transport.calls().is_empty());
    }

    #[tokio::test]
    async fn huge_interval_times_out_instead_of_sleeping() {
        let (tracker, transport) = tracker(FakeTransport::queue(vec![fake::json(
            200,
            json!({"task_id": "t-once", "state": "PENDING"}),
        )]));
        let policy = PollPolicy::default().with_interval(Duration::MAX);

        let err = wait_for_task(&tracker, "t-once", &policy, |_| {}).await.unwrap_err();
        assert!(matches!(err, WaitError::TimedOut { last_state: TaskState::Pending, .. }));
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn default_policy_is_explicit() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.max_wait, Some(Duration::from_secs(300)));
    }
}
