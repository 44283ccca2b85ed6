pub mod client;
pub mod command;
pub mod config;
mod dispatch;
mod error;
mod runner;
mod server;
mod store;
mod tasks;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::Error;
pub use server::{router, serve, Server};
pub use store::TaskStore;
pub use tasks::{CreateTask, Deleted, Task, TaskStatus, UpdateTask};
