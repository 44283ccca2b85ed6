use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::Error;
use crate::tasks::{Task, TaskStatus};


const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id            TEXT PRIMARY KEY,
    command       TEXT NOT NULL,
    status        TEXT NOT NULL,
    created_at_ms INTEGER NOT NULL,
    updated_at_ms INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS tasks_command ON tasks (command);
";

const COLUMNS: &str = "id, command, status, created_at_ms, updated_at_ms";


/// Durable record of every task. The single connection behind a Mutex is the
/// writer gate: concurrent inserts from submissions and updates from
/// completing executions are serialized here, last write wins.
pub struct TaskStore {
    conn: Mutex<Connection>,
}

impl TaskStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Assigns an identity, stamps both timestamps, and persists the task
    /// with status `Started`.
    pub async fn insert(&self, command: &str) -> Result<Task, Error> {
        let now = now_ms();
        let task = Task {
            id: Uuid::new_v4(),
            command: command.to_string(),
            status: TaskStatus::Started,
            created_at_ms: now,
            updated_at_ms: now,
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tasks (id, command, status, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.id.to_string(),
                task.command,
                task.status.as_str(),
                task.created_at_ms,
                task.updated_at_ms,
            ],
        )?;

        Ok(task)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
            params![id.to_string()],
            row_to_task,
        )
        .optional()?
        .ok_or(Error::TaskNotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Task>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM tasks ORDER BY rowid"))?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Secondary, non-unique lookup. Commands are not unique keys; matches
    /// come back in store order.
    pub async fn find_by_command(&self, command: &str) -> Result<Vec<Task>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE command = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(params![command], row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Full overwrite of one record by identity; bumps `updated_at_ms`.
    /// No optimistic concurrency check.
    pub async fn update(&self, task: &Task) -> Result<(), Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE tasks SET command = ?2, status = ?3, updated_at_ms = ?4 WHERE id = ?1",
            params![
                task.id.to_string(),
                task.command,
                task.status.as_str(),
                now_ms(),
            ],
        )?;
        Ok(())
    }

    pub async fn delete(&self, task: &Task) -> Result<(), Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM tasks WHERE id = ?1",
            params![task.id.to_string()],
        )?;
        Ok(())
    }
}


fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let status: String = row.get(2)?;
    Ok(Task {
        id: Uuid::parse_str(&id).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })?,
        command: row.get(1)?,
        status: TaskStatus::parse(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown task status: {status:?}").into(),
            )
        })?,
        created_at_ms: row.get(3)?,
        updated_at_ms: row.get(4)?,
    })
}


pub(crate) fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_identity_and_timestamps() {
        let store = TaskStore::open_in_memory().unwrap();
        let task = store.insert("echo hello").await.unwrap();

        assert_eq!(task.command, "echo hello");
        assert_eq!(task.status, TaskStatus::Started);
        assert!(task.created_at_ms > 0);
        assert_eq!(task.created_at_ms, task.updated_at_ms);

        let fetched = store.get(task.id).await.unwrap();
        assert_eq!(fetched.id, task.id);
        assert_eq!(fetched.command, task.command);
    }

    #[tokio::test]
    async fn identities_are_unique() {
        let store = TaskStore::open_in_memory().unwrap();
        let a = store.insert("sleep 1").await.unwrap();
        let b = store.insert("sleep 1").await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = Uuid::new_v4();
        match store.get(id).await {
            Err(Error::TaskNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected TaskNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_preserves_store_order() {
        let store = TaskStore::open_in_memory().unwrap();
        let a = store.insert("echo a").await.unwrap();
        let b = store.insert("echo b").await.unwrap();
        let c = store.insert("echo c").await.unwrap();

        let tasks = store.list().await.unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn find_by_command_returns_only_matches() {
        let store = TaskStore::open_in_memory().unwrap();
        let a = store.insert("sleep 1").await.unwrap();
        store.insert("echo other").await.unwrap();
        let b = store.insert("sleep 1").await.unwrap();

        let matches = store.find_by_command("sleep 1").await.unwrap();
        let ids: Vec<_> = matches.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert!(store.find_by_command("sleep 2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_record() {
        let store = TaskStore::open_in_memory().unwrap();
        let mut task = store.insert("echo hello").await.unwrap();

        task.status = TaskStatus::Completed;
        store.update(&task).await.unwrap();

        let fetched = store.get(task.id).await.unwrap();
        assert_eq!(fetched.status, TaskStatus::Completed);
        assert_eq!(fetched.command, "echo hello");
        assert!(fetched.updated_at_ms >= fetched.created_at_ms);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = TaskStore::open_in_memory().unwrap();
        let task = store.insert("echo hello").await.unwrap();
        store.delete(&task).await.unwrap();

        assert!(matches!(
            store.get(task.id).await,
            Err(Error::TaskNotFound(_))
        ));
        assert!(store.list().await.unwrap().is_empty());
    }
}
