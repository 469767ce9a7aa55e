//! Demo endpoints.
//!
//! Thin glue over the lifecycle manager: a liveness ping and a toy task
//! resource, enough to exercise the host end to end.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
}

pub async fn ping() -> Json<Value> {
    tracing::info!("ping endpoint called");
    Json(json!({ "message": "pong" }))
}

pub async fn list_tasks() -> Json<Value> {
    let tasks = vec![Task {
        id: Uuid::new_v4(),
        title: "Sample Task".to_string(),
        completed: false,
    }];

    tracing::info!(count = tasks.len(), "tasks retrieved");
    Json(json!({ "tasks": tasks }))
}

pub async fn create_task(Json(payload): Json<CreateTask>) -> (StatusCode, Json<Value>) {
    let task = Task {
        id: Uuid::new_v4(),
        title: payload.title,
        completed: false,
    };

    tracing::info!(task_title = %task.title, "task created");
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Task created", "task": task })),
    )
}
