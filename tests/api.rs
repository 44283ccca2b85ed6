use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use dispatchd::client::Client;
use dispatchd::{serve, Dispatcher, Server, TaskStatus, TaskStore};


const TOKEN: &str = "test-token";


async fn start_server() -> (String, Client) {
    let store = Arc::new(TaskStore::open_in_memory().unwrap());
    let dispatcher = Dispatcher::new(store, None);
    let server = Arc::new(Server::new(dispatcher, TOKEN.to_string()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(server, listener).await.unwrap();
    });

    let base = format!("http://{addr}");
    let client = Client::new(base.clone(), TOKEN.to_string());
    (base, client)
}


async fn wait_completed(client: &Client, id: Uuid) {
    for _ in 0..100 {
        if client.get_task(id).await.unwrap().status == TaskStatus::Completed {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("task {id} never completed");
}


#[tokio::test]
async fn create_runs_command_in_background() {
    let (_base, client) = start_server().await;

    let task = client.create_task("echo hello").await.unwrap();
    assert_eq!(task.status, TaskStatus::Started);
    assert_eq!(task.command, "echo hello");

    wait_completed(&client, task.id).await;
}


#[tokio::test]
async fn failing_command_still_reports_completed() {
    let (_base, client) = start_server().await;

    let task = client.create_task("false").await.unwrap();
    wait_completed(&client, task.id).await;
}


#[tokio::test]
async fn list_returns_every_submission() {
    let (_base, client) = start_server().await;

    let a = client.create_task("echo a").await.unwrap();
    let b = client.create_task("echo b").await.unwrap();

    let tasks = client.list_tasks().await.unwrap();
    let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}


#[tokio::test]
async fn get_unknown_task_is_not_found() {
    let (_base, client) = start_server().await;

    let err = client.get_task(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
}


#[tokio::test]
async fn update_rewrites_only_the_command() {
    let (_base, client) = start_server().await;

    let created = client.create_task("true").await.unwrap();
    wait_completed(&client, created.id).await;

    let updated = client.update_task("true", "false").await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.command, "false");
    assert_eq!(updated.status, TaskStatus::Completed);
}


#[tokio::test]
async fn delete_removes_all_matching_tasks() {
    let (_base, client) = start_server().await;

    let a = client.create_task("true").await.unwrap();
    let b = client.create_task("true").await.unwrap();

    let deleted = client.delete_task("true").await.unwrap();
    assert_eq!(deleted.deleted, 2);

    for id in [a.id, b.id] {
        let err = client.get_task(id).await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }
}


#[tokio::test]
async fn blank_command_is_rejected() {
    let (_base, client) = start_server().await;

    let err = client.create_task("   ").await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
}


#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let (base, _client) = start_server().await;

    let response = reqwest::Client::new()
        .get(format!("{base}/tasks"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    let response = reqwest::Client::new()
        .get(format!("{base}/tasks"))
        .header("token", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}
