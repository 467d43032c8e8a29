//! The entity store contract.

use std::sync::Arc;

use async_trait::async_trait;
use pulseboard_core::project::{NewProject, Project, UpdateProject};
use pulseboard_core::task::{NewTask, Task, UpdateTask};
use pulseboard_core::types::EntityId;

use crate::filter::{ProjectFilter, TaskFilter};
use crate::subscription::Subscription;

/// Errors surfaced at the store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not complete the operation (transient infrastructure
    /// failure). Mutation callers surface this for a user-visible retry.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness guarantee would be violated (duplicate share token on
    /// insert). Not expected in normal operation.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Uniform create/read/update/delete and change-subscription primitives
/// over the `projects` and `tasks` collections.
///
/// Contract highlights (see module docs on [`crate::subscription`]):
///
/// - `insert_*` assigns `id`, `created_at`, and `updated_at`; clients never
///   supply them.
/// - `update_*` applies `None`-keeps-current patch semantics, bumps
///   `updated_at`, and returns `None` when the id does not exist.
/// - `delete_*` returns whether a record was removed.
/// - `subscribe_*` queues an initial full snapshot before returning, then a
///   full snapshot after every commit touching a matching record (matching
///   before or after the change, so deletions fire too), in commit order.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // --- projects ---

    async fn insert_project(&self, input: NewProject) -> Result<Project, StoreError>;

    async fn query_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError>;

    async fn subscribe_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Subscription<Project>, StoreError>;

    async fn update_project(
        &self,
        id: &EntityId,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    async fn delete_project(&self, id: &EntityId) -> Result<bool, StoreError>;

    // --- tasks ---

    async fn insert_task(&self, input: NewTask) -> Result<Task, StoreError>;

    async fn query_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    async fn subscribe_tasks(&self, filter: TaskFilter) -> Result<Subscription<Task>, StoreError>;

    async fn update_task(
        &self,
        id: &EntityId,
        patch: UpdateTask,
    ) -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, id: &EntityId) -> Result<bool, StoreError>;
}

/// Shared, dynamically-dispatched store as held by services and feeds.
pub type DynStore = Arc<dyn EntityStore>;
