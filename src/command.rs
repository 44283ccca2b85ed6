use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

mod run;

pub use run::run;


#[derive(Parser)]
#[command(name = "dispatchd", about = "Task dispatch server", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}


#[derive(Subcommand)]
pub enum Command {
    /// Start the dispatch server
    Serve {
        /// Path to the JSON configuration file
        #[arg(long, default_value = "config.json")]
        config: String,
    },
    /// Submit a command as a new task
    Create {
        command: String,
        #[command(flatten)]
        remote: Remote,
    },
    /// List all tasks
    List {
        #[command(flatten)]
        remote: Remote,
    },
    /// Show one task by id
    Get {
        id: Uuid,
        #[command(flatten)]
        remote: Remote,
    },
    /// Rewrite the stored command on the first task matching a command
    Update {
        command: String,
        new_command: String,
        #[command(flatten)]
        remote: Remote,
    },
    /// Delete every task matching a command
    Delete {
        command: String,
        #[command(flatten)]
        remote: Remote,
    },
}


#[derive(Args)]
pub struct Remote {
    /// Base URL of the dispatch server
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    pub server: String,
    /// Token expected by the server
    #[arg(long)]
    pub token: String,
}


#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dispatch(#[from] crate::error::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
