//! Handlers for task resources.
//!
//! Creation and listing are nested under the parent project
//! (`/projects/{project_id}/tasks`); update and delete address tasks
//! directly (`/tasks/{id}`). All endpoints require the owner tier.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use pulseboard_core::task::{CreateTask, Task, UpdateTask};
use pulseboard_core::types::EntityId;
use pulseboard_sync::{service, OwnerScope};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn scope(auth: AuthUser) -> AppResult<OwnerScope> {
    Ok(OwnerScope::resolve(Some(auth.owner_id))?)
}

/// POST /api/v1/projects/{project_id}/tasks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<EntityId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let scope = scope(auth)?;
    let task = service::create_task(&state.store, &scope, &project_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/projects/{project_id}/tasks
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let scope = scope(auth)?;
    let tasks = service::list_tasks(&state.store, &scope, &project_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let scope = scope(auth)?;
    let task = service::update_task(&state.store, &scope, &id, input).await?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    let scope = scope(auth)?;
    service::delete_task(&state.store, &scope, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
