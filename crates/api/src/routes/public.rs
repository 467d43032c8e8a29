//! Route definitions for the anonymous surface: share-token reads and the
//! WebSocket live views.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;
use crate::ws;

/// Anonymous and WebSocket routes.
///
/// ```text
/// GET /public/projects/{public_id}          -> one-shot read (no auth)
/// GET /ws/projects?token=...                -> owner live feed
/// GET /ws/public/projects/{public_id}       -> public live feed (no auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public/projects/{public_id}", get(public::get_detail))
        .route("/ws/projects", get(ws::owner_ws))
        .route("/ws/public/projects/{public_id}", get(ws::public_ws))
}
