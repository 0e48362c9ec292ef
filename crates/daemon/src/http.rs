use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bankwatch_core::{MessageRecord, Task, WatchKey, Watchdesk, WorkflowError};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    desk: Arc<Watchdesk>,
}

pub fn router(desk: Arc<Watchdesk>) -> Router {
    let state = AppState { desk };
    Router::new()
        .route("/healthz", get(healthz))
        .route("/task/", post(create_task).get(list_tasks))
        .route("/messages/", post(fetch_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Response to a task registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub task_guid: u64,
}

/// Body of a message fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchMessagesRequest {
    pub guid: u64,
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_task(
    State(st): State<AppState>,
    Json(key): Json<WatchKey>,
) -> Result<(StatusCode, Json<CreateTaskResponse>), ApiError> {
    let task_guid = st.desk.create_task(key).await?;
    Ok((StatusCode::CREATED, Json(CreateTaskResponse { task_guid })))
}

async fn list_tasks(State(st): State<AppState>) -> Json<Vec<Task>> {
    Json(st.desk.list_tasks().await)
}

async fn fetch_messages(
    State(st): State<AppState>,
    Json(req): Json<FetchMessagesRequest>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    let messages = st.desk.fetch_messages_for_task(req.guid).await?;
    Ok(Json(messages))
}

#[derive(Debug)]
pub struct ApiError(WorkflowError);

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            WorkflowError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "Task not found"),
            WorkflowError::UpstreamCredentialsInvalid => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid fedresurs API login or password",
            ),
            WorkflowError::NoMessagesFound => {
                (StatusCode::INTERNAL_SERVER_ERROR, "No messages found")
            }
            WorkflowError::Upstream(e) => {
                tracing::error!(error = %e, "upstream sync failed");
                (StatusCode::BAD_GATEWAY, "Upstream request failed")
            }
            WorkflowError::Store(e) => {
                tracing::error!(error = %e, "task store failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
