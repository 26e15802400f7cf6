//! Read-only view of server-side asynchronous tasks.
//!
//! # Design
//! The server owns every task; the client only ever holds the snapshot from
//! its latest read. `TaskTracker::get_status` is a single stateless
//! `GET /tasks/{task_id}` with no caching and no scheduling. Polling cadence
//! belongs to `poll::wait_for_task`.
//!
//! `TaskPhase` carries the terminal payloads, so a `Success` always has a
//! result and never an error, and a `Failure` the opposite.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{segment, HttpRequest};

/// Message used when the server reports a failure without saying why.
pub const UNKNOWN_TASK_ERROR: &str = "unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Progress,
    Success,
    Failure,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub current: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskPhase {
    Pending,
    Progress(Option<TaskProgress>),
    Success(serde_json::Value),
    Failure(String),
}

/// Snapshot of one task as last reported by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TaskStatusWire")]
pub struct TaskHandle {
    pub task_id: String,
    /// Free-form status line from the server.
    pub status_text: Option<String>,
    pub phase: TaskPhase,
}

impl TaskHandle {
    pub fn state(&self) -> TaskState {
        match self.phase {
            TaskPhase::Pending => TaskState::Pending,
            TaskPhase::Progress(_) => TaskState::Progress,
            TaskPhase::Success(_) => TaskState::Success,
            TaskPhase::Failure(_) => TaskState::Failure,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn progress(&self) -> Option<TaskProgress> {
        match self.phase {
            TaskPhase::Progress(progress) => progress,
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        match &self.phase {
            TaskPhase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            TaskPhase::Failure(error) => Some(error),
            _ => None,
        }
    }
}

/// `GET /tasks/{id}` body as sent by the server.
#[derive(Debug, Deserialize)]
struct TaskStatusWire {
    task_id: String,
    state: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    current: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl From<TaskStatusWire> for TaskHandle {
    fn from(wire: TaskStatusWire) -> Self {
        let phase = match wire.state.as_str() {
            "PENDING" => TaskPhase::Pending,
            "PROGRESS" => TaskPhase::Progress(match (wire.current, wire.total) {
                (Some(current), Some(total)) => Some(TaskProgress { current, total }),
                _ => None,
            }),
            "SUCCESS" => TaskPhase::Success(wire.result.unwrap_or(serde_json::Value::Null)),
            "FAILURE" => TaskPhase::Failure(
                wire.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_TASK_ERROR.to_string()),
            ),
            other => {
                warn!(task_id = %wire.task_id, state = other, "unrecognized task state, treating as in progress");
                TaskPhase::Progress(None)
            }
        };
        Self {
            task_id: wire.task_id,
            status_text: wire.status,
            phase,
        }
    }
}

/// Returned by endpoints that start a long-running job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reads task snapshots through the shared pipeline.
#[derive(Debug, Clone)]
pub struct TaskTracker {
    client: ApiClient,
}

impl TaskTracker {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current snapshot of `task_id`. Unknown ids fail with the server's 404.
    pub async fn get_status(&self, task_id: &str) -> Result<TaskHandle, ApiError> {
        self.client.json(HttpRequest::get(format!("/tasks/{}", segment(task_id)))).await
    }
}
