use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Error;
use crate::runner;
use crate::store::TaskStore;
use crate::tasks::Task;


/// Coordinates the task lifecycle: persists a record, launches its command
/// in the background, and serves lookups against the store.
pub struct Dispatcher {
    store: Arc<TaskStore>,
    limit: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    /// `max_in_flight` caps how many commands run at once. `None` means
    /// unbounded, the default behavior: submission count equals concurrent
    /// execution count.
    pub fn new(store: Arc<TaskStore>, max_in_flight: Option<usize>) -> Self {
        Self {
            store,
            limit: max_in_flight.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Persists the task with status `Started` and launches its command
    /// without waiting for it. Returns as soon as the record is durable;
    /// completion is observed later through `get` or `list`.
    pub async fn submit(&self, command: &str) -> Result<Task, Error> {
        if command.trim().is_empty() {
            return Err(Error::Validation("command must not be empty".to_string()));
        }

        let task = self.store.insert(command).await?;
        info!(task = %task.id, command = %task.command, "task started");

        let store = self.store.clone();
        let limit = self.limit.clone();
        let running = task.clone();
        tokio::spawn(async move {
            // The permit is acquired here rather than in submit so a full
            // pool delays execution, never the submission response.
            let _permit = match limit {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            if let Err(err) = runner::run(&store, running).await {
                warn!(%err, "task completion could not be recorded");
            }
        });

        Ok(task)
    }

    pub async fn list(&self) -> Result<Vec<Task>, Error> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, Error> {
        self.store.get(id).await
    }

    /// Rewrites the stored command on the first task, in store order, whose
    /// command equals `key`. Never re-runs anything; status and identity are
    /// untouched.
    pub async fn update_command(&self, key: &str, new_command: &str) -> Result<Task, Error> {
        if new_command.trim().is_empty() {
            return Err(Error::Validation("command must not be empty".to_string()));
        }

        let mut task = self
            .store
            .find_by_command(key)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoSuchCommand(key.to_string()))?;

        task.command = new_command.to_string();
        self.store.update(&task).await?;
        self.store.get(task.id).await
    }

    /// Removes every task whose stored command equals `key`; returns how
    /// many were removed.
    pub async fn delete(&self, key: &str) -> Result<usize, Error> {
        let tasks = self.store.find_by_command(key).await?;
        if tasks.is_empty() {
            return Err(Error::NoSuchCommand(key.to_string()));
        }

        for task in &tasks {
            self.store.delete(task).await?;
        }
        info!(command = %key, deleted = tasks.len(), "tasks deleted");

        Ok(tasks.len())
    }
}
