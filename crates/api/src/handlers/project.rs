//! Handlers for the `/projects` resource.
//!
//! All endpoints require the owner tier via [`AuthUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use pulseboard_core::project::{CreateProject, Project, UpdateProject};
use pulseboard_core::types::EntityId;
use pulseboard_sync::{service, OwnerScope};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn scope(auth: AuthUser) -> AppResult<OwnerScope> {
    Ok(OwnerScope::resolve(Some(auth.owner_id))?)
}

/// POST /api/v1/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let scope = scope(auth)?;
    let project = service::create_project(&state.store, &scope, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let scope = scope(auth)?;
    let projects = service::list_projects(&state.store, &scope).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let scope = scope(auth)?;
    let project = service::get_project(&state.store, &scope, &id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let scope = scope(auth)?;
    let project = service::update_project(&state.store, &scope, &id, input).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Cascades to the project's tasks. A partial cascade failure surfaces as
/// 207 with the surviving task ids; the project itself is gone either way.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    let scope = scope(auth)?;
    service::delete_project(&state.store, &scope, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
