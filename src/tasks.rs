use serde::{Deserialize, Serialize};
use uuid::Uuid;


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTask {
    pub command: String,
}


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateTask {
    pub command: String,
}


/// One unit of work: a command line, its execution status, and timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub command: String,
    pub status: TaskStatus,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}


/// A task only ever moves `Started -> Completed`. There is no failure
/// status: a command that exits non-zero or never launches still completes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub enum TaskStatus {
    Started,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Started => "Started",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Started" => Some(TaskStatus::Started),
            "Completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}


/// Acknowledgment for delete-by-command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: usize,
}
