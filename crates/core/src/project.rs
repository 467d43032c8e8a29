//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, OwnerId, Timestamp};

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Testing,
    Completed,
    OnHold,
}

/// A project document from the `projects` collection.
///
/// `id`, `created_at`, and `updated_at` are assigned by the store adapter
/// and never accepted from a client. `public_id` and `owner_id` are fixed
/// at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    /// Opaque share token; the only key usable without an owner match.
    pub public_id: String,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub project_url: Option<String>,
    pub estimated_deadline: Option<Timestamp>,
    pub status: ProjectStatus,
    /// Last-persisted completion percentage. May be stale relative to the
    /// live-computed value; the live value wins when available.
    pub progress: u8,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
///
/// `owner_id` and `public_id` are stamped by the service layer, never
/// supplied by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    #[validate(email(message = "client_email must be a valid email address"))]
    pub client_email: Option<String>,
    #[validate(url(message = "project_url must be a valid URL"))]
    pub project_url: Option<String>,
    pub estimated_deadline: Option<Timestamp>,
    /// Defaults to `planning` if omitted.
    pub status: Option<ProjectStatus>,
}

/// DTO for updating an existing project. All fields are optional; `None`
/// leaves the stored value untouched. `owner_id` and `public_id` are not
/// patchable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    #[validate(email(message = "client_email must be a valid email address"))]
    pub client_email: Option<String>,
    #[validate(url(message = "project_url must be a valid URL"))]
    pub project_url: Option<String>,
    pub estimated_deadline: Option<Timestamp>,
    pub status: Option<ProjectStatus>,
    /// Persisted progress override (0–100).
    #[validate(range(max = 100, message = "progress must be between 0 and 100"))]
    pub progress: Option<u8>,
}

/// Everything the store needs to materialize a new project document.
/// Built by the service layer from a validated [`CreateProject`].
#[derive(Debug, Clone)]
pub struct NewProject {
    pub public_id: String,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub project_url: Option<String>,
    pub estimated_deadline: Option<Timestamp>,
    pub status: ProjectStatus,
    pub progress: u8,
}

/// Client-safe projection of a [`Project`] served to the public tier.
///
/// Omits `id`, `owner_id`, and the client contact fields -- an anonymous
/// viewer gets the share token back and nothing that identifies the owner.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProject {
    pub public_id: String,
    pub name: String,
    pub description: Option<String>,
    pub project_url: Option<String>,
    pub estimated_deadline: Option<Timestamp>,
    pub status: ProjectStatus,
}

impl From<&Project> for PublicProject {
    fn from(project: &Project) -> Self {
        Self {
            public_id: project.public_id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            project_url: project.project_url.clone(),
            estimated_deadline: project.estimated_deadline,
            status: project.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
    }

    #[test]
    fn create_rejects_bad_email() {
        let input = CreateProject {
            name: "Site relaunch".into(),
            description: None,
            client_name: None,
            client_email: Some("not-an-email".into()),
            project_url: None,
            estimated_deadline: None,
            status: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_accepts_minimal_input() {
        let input = CreateProject {
            name: "Site relaunch".into(),
            description: None,
            client_name: None,
            client_email: None,
            project_url: None,
            estimated_deadline: None,
            status: None,
        };
        assert!(input.validate().is_ok());
    }
}
