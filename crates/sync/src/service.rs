//! Mutation operations and view entry points.
//!
//! Every mutation takes an [`OwnerScope`] -- the tier resolver's proof of an
//! authenticated principal. Ownership checks report `NotFound` for records
//! outside the caller's scope, indistinguishable from records that do not
//! exist.

use validator::Validate;

use pulseboard_core::progress::completion_percent;
use pulseboard_core::project::{CreateProject, NewProject, Project, PublicProject, UpdateProject};
use pulseboard_core::task::{CreateTask, NewTask, Task, UpdateTask};
use pulseboard_core::types::EntityId;
use pulseboard_core::{public_id, CoreError};
use pulseboard_store::{DynStore, ProjectFilter, StoreError, TaskFilter};

use crate::access::{OwnerScope, PublicScope};
use crate::owner_feed::OwnerFeed;
use crate::public_feed::PublicFeed;
use crate::snapshot::{Progress, ProjectDetail};

fn store_err(err: StoreError) -> CoreError {
    match err {
        StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
        StoreError::Conflict(msg) => CoreError::Conflict(msg),
    }
}

fn validation_err(err: validator::ValidationErrors) -> CoreError {
    CoreError::Validation(err.to_string())
}

/// Fetch a project by id and verify ownership. A missing project and a
/// project owned by someone else produce the same `NotFound`.
async fn owned_project(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
) -> Result<Project, CoreError> {
    let found = store
        .query_projects(&ProjectFilter::Id(id.clone()))
        .await
        .map_err(store_err)?;
    match found.into_iter().next() {
        Some(project) if scope.owns(&project) => Ok(project),
        _ => Err(CoreError::project_not_found(id.clone())),
    }
}

// ---------------------------------------------------------------------------
// Project operations (owner tier)
// ---------------------------------------------------------------------------

/// Create a project for the scope's principal. The share token is generated
/// here and is permanent for the project's lifetime.
pub async fn create_project(
    store: &DynStore,
    scope: &OwnerScope,
    input: CreateProject,
) -> Result<Project, CoreError> {
    input.validate().map_err(validation_err)?;

    let record = NewProject {
        public_id: public_id::generate(),
        owner_id: scope.owner_id().clone(),
        name: input.name,
        description: input.description,
        client_name: input.client_name,
        client_email: input.client_email,
        project_url: input.project_url,
        estimated_deadline: input.estimated_deadline,
        status: input.status.unwrap_or_default(),
        progress: 0,
    };
    let project = store.insert_project(record).await.map_err(store_err)?;
    tracing::info!(project_id = %project.id, owner_id = %project.owner_id, "project created");
    Ok(project)
}

/// List the principal's projects, most recently created first.
pub async fn list_projects(store: &DynStore, scope: &OwnerScope) -> Result<Vec<Project>, CoreError> {
    let mut projects = store
        .query_projects(&scope.project_filter())
        .await
        .map_err(store_err)?;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(projects)
}

/// Fetch one of the principal's projects by id.
pub async fn get_project(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
) -> Result<Project, CoreError> {
    owned_project(store, scope, id).await
}

/// Patch one of the principal's projects.
pub async fn update_project(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
    patch: UpdateProject,
) -> Result<Project, CoreError> {
    patch.validate().map_err(validation_err)?;
    owned_project(store, scope, id).await?;

    store
        .update_project(id, patch)
        .await
        .map_err(store_err)?
        .ok_or_else(|| CoreError::project_not_found(id.clone()))
}

/// Delete one of the principal's projects and, in a second phase, every
/// task referencing it.
///
/// The parent delete commits first; a task delete that then fails leaves
/// the project gone and is reported via `PartialCascadeFailure` listing the
/// surviving task ids, so the caller can retry cleanup.
pub async fn delete_project(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
) -> Result<(), CoreError> {
    owned_project(store, scope, id).await?;

    let tasks = store
        .query_tasks(&TaskFilter::Project(id.clone()))
        .await
        .map_err(store_err)?;

    let deleted = store.delete_project(id).await.map_err(store_err)?;
    if !deleted {
        return Err(CoreError::project_not_found(id.clone()));
    }

    let mut failed_task_ids = Vec::new();
    for task in &tasks {
        match store.delete_task(&task.id).await {
            // Ok(false) means the task vanished concurrently -- the goal
            // state (no task referencing the project) is reached either way.
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(task_id = %task.id, error = %err, "cascade task delete failed");
                failed_task_ids.push(task.id.clone());
            }
        }
    }

    if failed_task_ids.is_empty() {
        tracing::info!(project_id = %id, task_count = tasks.len(), "project deleted");
        Ok(())
    } else {
        Err(CoreError::PartialCascadeFailure {
            project_id: id.clone(),
            failed_task_ids,
        })
    }
}

// ---------------------------------------------------------------------------
// Task operations (owner tier)
// ---------------------------------------------------------------------------

/// Fetch a task and verify the caller owns its parent project.
async fn owned_task(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
) -> Result<Task, CoreError> {
    let found = store
        .query_tasks(&TaskFilter::Id(id.clone()))
        .await
        .map_err(store_err)?;
    let Some(task) = found.into_iter().next() else {
        return Err(CoreError::task_not_found(id.clone()));
    };
    // Ownership of the task is ownership of its parent; a task under
    // someone else's project must look nonexistent.
    owned_project(store, scope, &task.project_id)
        .await
        .map_err(|_| CoreError::task_not_found(id.clone()))?;
    Ok(task)
}

/// Create a task under one of the principal's projects.
pub async fn create_task(
    store: &DynStore,
    scope: &OwnerScope,
    project_id: &EntityId,
    input: CreateTask,
) -> Result<Task, CoreError> {
    input.validate().map_err(validation_err)?;
    // The parent must be live and owned; this is also the referential
    // integrity check for `project_id`.
    owned_project(store, scope, project_id).await?;

    let record = NewTask {
        project_id: project_id.clone(),
        title: input.title,
        description: input.description,
        status: input.status.unwrap_or_default(),
        priority: input.priority.unwrap_or_default(),
        due_date: input.due_date,
    };
    let task = store.insert_task(record).await.map_err(store_err)?;
    tracing::info!(task_id = %task.id, project_id = %project_id, "task created");
    Ok(task)
}

/// List the tasks of one of the principal's projects, newest first.
pub async fn list_tasks(
    store: &DynStore,
    scope: &OwnerScope,
    project_id: &EntityId,
) -> Result<Vec<Task>, CoreError> {
    owned_project(store, scope, project_id).await?;
    let mut tasks = store
        .query_tasks(&TaskFilter::Project(project_id.clone()))
        .await
        .map_err(store_err)?;
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(tasks)
}

/// Patch a task under one of the principal's projects.
pub async fn update_task(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
    patch: UpdateTask,
) -> Result<Task, CoreError> {
    patch.validate().map_err(validation_err)?;
    owned_task(store, scope, id).await?;

    store
        .update_task(id, patch)
        .await
        .map_err(store_err)?
        .ok_or_else(|| CoreError::task_not_found(id.clone()))
}

/// Delete a task under one of the principal's projects.
pub async fn delete_task(
    store: &DynStore,
    scope: &OwnerScope,
    id: &EntityId,
) -> Result<(), CoreError> {
    owned_task(store, scope, id).await?;
    let deleted = store.delete_task(id).await.map_err(store_err)?;
    if deleted {
        Ok(())
    } else {
        Err(CoreError::task_not_found(id.clone()))
    }
}

// ---------------------------------------------------------------------------
// Public tier
// ---------------------------------------------------------------------------

/// Resolve a share token to its project: a single point lookup, never an
/// enumeration. Any unknown or malformed token is `NotFound` -- similar
/// tokens existing or not is never observable.
pub async fn resolve_public(store: &DynStore, scope: &PublicScope) -> Result<Project, CoreError> {
    let found = store
        .query_projects(&scope.project_filter())
        .await
        .map_err(store_err)?;
    found.into_iter().next().ok_or_else(|| CoreError::NotFound {
        entity: "Project",
        id: scope.public_id().to_string(),
    })
}

/// One-shot public read: the client-safe project, its tasks (newest
/// first), and progress computed from the task set just read.
pub async fn public_detail(
    store: &DynStore,
    scope: &PublicScope,
) -> Result<ProjectDetail, CoreError> {
    let project = resolve_public(store, scope).await?;
    let mut tasks = store
        .query_tasks(&TaskFilter::Project(project.id.clone()))
        .await
        .map_err(store_err)?;
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let progress = Progress::Live(completion_percent(&tasks));
    Ok(ProjectDetail {
        project: PublicProject::from(&project),
        tasks,
        progress,
    })
}

// ---------------------------------------------------------------------------
// Live feeds
// ---------------------------------------------------------------------------

/// Open the owner-tier live feed for the scope's principal.
pub async fn open_owner_feed(store: &DynStore, scope: &OwnerScope) -> Result<OwnerFeed, CoreError> {
    OwnerFeed::open(store.clone(), scope).await
}

/// Resolve a share token and open the read-only live feed on its project.
pub async fn open_public_feed(
    store: &DynStore,
    scope: &PublicScope,
) -> Result<PublicFeed, CoreError> {
    let project = resolve_public(store, scope).await?;
    PublicFeed::open(store.clone(), project).await
}
