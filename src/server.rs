use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::error::Error;

mod handlers;


pub struct Server {
    pub dispatcher: Dispatcher,
    token: String,
}

impl Server {
    pub fn new(dispatcher: Dispatcher, token: String) -> Self {
        Self { dispatcher, token }
    }
}


pub struct ServerError(Error);

impl From<Error> for ServerError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::TaskNotFound(_) | Error::NoSuchCommand(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) | Error::Config(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.0.to_string()).into_response()
    }
}


/// The one path parameter doubles as a task id for GET and as a command key
/// for PUT and DELETE.
pub fn router(server: Arc<Server>) -> axum::Router {
    axum::Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/task/:key",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .layer(middleware::from_fn_with_state(server.clone(), authorize))
        .with_state(server)
}


pub async fn serve(
    server: Arc<Server>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router(server)).await
}


/// Every operation is reachable only with the configured token in the
/// `token` request header. The dispatcher itself never sees credentials.
async fn authorize(
    State(server): State<Arc<Server>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("token")
        .and_then(|value| value.to_str().ok());

    if presented != Some(server.token.as_str()) {
        return (StatusCode::UNAUTHORIZED, "401 - Unauthorized").into_response();
    }

    next.run(request).await
}
