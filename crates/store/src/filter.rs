//! Typed filter predicates for the two collections.
//!
//! A filter is the unit the access tier resolver hands to the store: it is
//! data, not a closure, so subscriptions can store and re-evaluate it on
//! every commit.

use pulseboard_core::project::Project;
use pulseboard_core::task::Task;
use pulseboard_core::types::{EntityId, OwnerId};

/// Predicate over the `projects` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectFilter {
    /// Every project created by the given owner (owner tier).
    Owner(OwnerId),
    /// Exactly the project carrying the given share token (public tier).
    PublicId(String),
    /// Exactly the project with the given store id.
    Id(EntityId),
    /// Every project. Internal and test use only -- no access tier resolves
    /// to this.
    All,
}

impl ProjectFilter {
    /// Whether `project` satisfies this predicate.
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            ProjectFilter::Owner(owner_id) => project.owner_id == *owner_id,
            ProjectFilter::PublicId(public_id) => project.public_id == *public_id,
            ProjectFilter::Id(id) => project.id == *id,
            ProjectFilter::All => true,
        }
    }
}

/// Predicate over the `tasks` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every task referencing the given project.
    Project(EntityId),
    /// Exactly the task with the given store id.
    Id(EntityId),
    /// Every task. Internal and test use only.
    All,
}

impl TaskFilter {
    /// Whether `task` satisfies this predicate.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::Project(project_id) => task.project_id == *project_id,
            TaskFilter::Id(id) => task.id == *id,
            TaskFilter::All => true,
        }
    }
}
