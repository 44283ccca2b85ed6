use thiserror::Error;
use uuid::Uuid;


#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid command: {0}")]
    Validation(String),

    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("no task with command: {0:?}")]
    NoSuchCommand(String),

    #[error("storage: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
