use uuid::Uuid;

use crate::tasks::{CreateTask, Deleted, Task, UpdateTask};


/// HTTP client for the dispatch API, used by the CLI subcommands.
#[derive(Clone, Debug)]
pub struct Client {
    reqwest: reqwest::Client,
    server: String,
    token: String,
}

impl Client {
    pub fn new(server: String, token: String) -> Self {
        Self {
            reqwest: reqwest::Client::new(),
            server,
            token,
        }
    }

    pub async fn create_task(&self, command: &str) -> Result<Task, reqwest::Error> {
        self.reqwest
            .post(format!("{}/tasks", self.server))
            .header("token", &self.token)
            .json(&CreateTask {
                command: command.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, reqwest::Error> {
        self.reqwest
            .get(format!("{}/tasks", self.server))
            .header("token", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, reqwest::Error> {
        self.reqwest
            .get(format!("{}/task/{}", self.server, id))
            .header("token", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn update_task(
        &self,
        command: &str,
        new_command: &str,
    ) -> Result<Task, reqwest::Error> {
        self.reqwest
            .put(format!("{}/task/{}", self.server, command))
            .header("token", &self.token)
            .json(&UpdateTask {
                command: new_command.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn delete_task(&self, command: &str) -> Result<Deleted, reqwest::Error> {
        self.reqwest
            .delete(format!("{}/task/{}", self.server, command))
            .header("token", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
