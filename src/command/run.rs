use clap::Parser;
use std::sync::Arc;
use tracing::info;

use crate::client::Client;
use crate::command::{Cli, Command, Error, Remote};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::server::{self, Server};
use crate::store::TaskStore;


pub async fn run() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Serve { config } => {
            serve(&config).await?;
        }
        Command::Create { command, remote } => {
            let task = client(remote).create_task(&command).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Command::List { remote } => {
            let tasks = client(remote).list_tasks().await?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Command::Get { id, remote } => {
            let task = client(remote).get_task(id).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Command::Update {
            command,
            new_command,
            remote,
        } => {
            let task = client(remote).update_task(&command, &new_command).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Command::Delete { command, remote } => {
            let deleted = client(remote).delete_task(&command).await?;
            println!("{}", serde_json::to_string_pretty(&deleted)?);
        }
    }
    Ok(())
}


async fn serve(config_path: &str) -> Result<(), Error> {
    let config = Config::load(config_path)?;
    let store = Arc::new(TaskStore::open(&config.database)?);
    let dispatcher = Dispatcher::new(store, config.max_in_flight);
    let server = Arc::new(Server::new(dispatcher, config.token.clone()));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, database = %config.database, "dispatch server listening");

    server::serve(server, listener).await?;
    Ok(())
}


fn client(remote: Remote) -> Client {
    Client::new(remote.server, remote.token)
}
