use crate::types::EntityId;

/// Domain error taxonomy shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An owner-tier operation was attempted without a valid principal, or
    /// with a principal that does not own the target record. Never retried
    /// automatically.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The target record does not exist -- or exists outside the caller's
    /// scope, which must be indistinguishable from "does not exist".
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input failed validation before reaching the store.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness guarantee would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The project record was deleted but one or more dependent task
    /// deletes failed. The project is gone regardless; the listed tasks
    /// survived and the caller can retry cleanup.
    #[error("Project {project_id} deleted but {} task(s) survived", failed_task_ids.len())]
    PartialCascadeFailure {
        project_id: EntityId,
        failed_task_ids: Vec<EntityId>,
    },

    /// The entity store could not complete an operation (transient
    /// infrastructure failure). Surfaced to mutation callers for a
    /// user-visible retry.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CoreError {
    /// Wrap a store-layer failure.
    pub fn store(err: impl std::fmt::Display) -> Self {
        CoreError::StoreUnavailable(err.to_string())
    }

    /// Shorthand for a `NotFound` on the `projects` collection.
    pub fn project_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Project",
            id: id.into(),
        }
    }

    /// Shorthand for a `NotFound` on the `tasks` collection.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Task",
            id: id.into(),
        }
    }
}
