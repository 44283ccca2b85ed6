use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::server::{Server, ServerError};
use crate::tasks::{CreateTask, Deleted, Task, UpdateTask};


pub async fn create_task(
    State(server): State<Arc<Server>>,
    Json(body): Json<CreateTask>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(server.dispatcher.submit(&body.command).await?))
}


pub async fn list_tasks(
    State(server): State<Arc<Server>>,
) -> Result<Json<Vec<Task>>, ServerError> {
    Ok(Json(server.dispatcher.list().await?))
}


pub async fn get_task(
    State(server): State<Arc<Server>>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(server.dispatcher.get(task_id).await?))
}


pub async fn update_task(
    State(server): State<Arc<Server>>,
    Path(command): Path<String>,
    Json(body): Json<UpdateTask>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(
        server.dispatcher.update_command(&command, &body.command).await?,
    ))
}


pub async fn delete_task(
    State(server): State<Arc<Server>>,
    Path(command): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let deleted = server.dispatcher.delete(&command).await?;
    Ok(Json(Deleted { deleted }))
}
