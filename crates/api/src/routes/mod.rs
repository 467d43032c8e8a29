//! Route tree assembly.

pub mod health;
pub mod project;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                 list, create          (owner)
/// /projects/{id}                            get, update, delete   (owner)
/// /projects/{project_id}/tasks              list, create          (owner)
/// /tasks/{id}                               update, delete        (owner)
///
/// /public/projects/{public_id}              one-shot read         (anonymous)
///
/// /ws/projects?token=...                    owner live feed       (WebSocket)
/// /ws/public/projects/{public_id}           public live feed      (WebSocket)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(project::router())
        .merge(public::router())
}

/// The complete application router: health probe at the root, everything
/// else under `/api/v1`. Middleware is layered on top by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1", api_routes())
        .with_state(state)
}
