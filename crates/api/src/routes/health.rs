//! Root-level health probe.

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Routes mounted at the root (outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::health))
}
