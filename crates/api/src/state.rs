use std::sync::Arc;

use pulseboard_store::DynStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The entity store the whole surface reads and mutates through.
    pub store: DynStore,
    /// Server configuration (JWT secret, CORS, timeouts).
    pub config: Arc<ServerConfig>,
}
