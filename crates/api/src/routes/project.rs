//! Route definitions for the owner-tier resources.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{project, task};
use crate::state::AppState;

/// Owner-tier routes.
///
/// ```text
/// GET    /projects                          -> list
/// POST   /projects                          -> create
/// GET    /projects/{id}                     -> get_by_id
/// PUT    /projects/{id}                     -> update
/// DELETE /projects/{id}                     -> delete (cascades to tasks)
///
/// GET    /projects/{project_id}/tasks       -> list_by_project
/// POST   /projects/{project_id}/tasks       -> create
/// PUT    /tasks/{id}                        -> update
/// DELETE /tasks/{id}                        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(project::list).post(project::create))
        .route(
            "/projects/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/projects/{project_id}/tasks",
            get(task::list_by_project).post(task::create),
        )
        .route("/tasks/{id}", put(task::update).delete(task::delete))
}
