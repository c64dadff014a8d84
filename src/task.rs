//! Task state labels
//!
//! Registration runs as an asynchronous task; the response carries the
//! task's state as a plain label. Labels outside this set are still valid
//! statuses, they just do not map to a `TaskState`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known task state labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Task accepted, not yet started
    Created,
    /// Task is executing
    Running,
    /// Task finished successfully
    Completed,
    /// Task failed
    Failed,
    /// Task was cancelled
    Cancelled,
    /// Task finished but some of its work failed
    CompletedWithError,
}

impl TaskState {
    /// Returns the wire label for this state
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Created => "CREATED",
            TaskState::Running => "RUNNING",
            TaskState::Completed => "COMPLETED",
            TaskState::Failed => "FAILED",
            TaskState::Cancelled => "CANCELLED",
            TaskState::CompletedWithError => "COMPLETED_WITH_ERROR",
        }
    }

    /// Map a label to a known state. Matching is exact.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "CREATED" => Some(TaskState::Created),
            "RUNNING" => Some(TaskState::Running),
            "COMPLETED" => Some(TaskState::Completed),
            "FAILED" => Some(TaskState::Failed),
            "CANCELLED" => Some(TaskState::Cancelled),
            "COMPLETED_WITH_ERROR" => Some(TaskState::CompletedWithError),
            _ => None,
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Created | TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        state.as_str().to_string()
    }
}
