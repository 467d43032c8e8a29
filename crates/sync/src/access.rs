//! Access tier resolution.
//!
//! Resolution is pure -- no I/O happens here. A scope is both the filter
//! predicate handed to the store and the capability token checked by the
//! mutation layer: every mutation operation takes `&OwnerScope`, and
//! nothing mutable is reachable from a [`PublicScope`].

use pulseboard_core::project::Project;
use pulseboard_core::types::OwnerId;
use pulseboard_core::CoreError;
use pulseboard_store::ProjectFilter;

/// Owner tier: authenticated access scoped to records created by the
/// current principal.
#[derive(Debug, Clone)]
pub struct OwnerScope {
    owner_id: OwnerId,
}

impl OwnerScope {
    /// Resolve the owner tier from the current principal.
    ///
    /// Fails with `NotAuthorized` when there is no authenticated principal;
    /// this is the only authorization failure the resolver produces.
    pub fn resolve(principal: Option<OwnerId>) -> Result<Self, CoreError> {
        principal.map(|owner_id| Self { owner_id }).ok_or_else(|| {
            CoreError::NotAuthorized("owner tier requires an authenticated principal".into())
        })
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// The project predicate this scope is allowed to see.
    pub fn project_filter(&self) -> ProjectFilter {
        ProjectFilter::Owner(self.owner_id.clone())
    }

    /// Whether the given project belongs to this scope's principal.
    pub fn owns(&self, project: &Project) -> bool {
        project.owner_id == self.owner_id
    }
}

/// Public tier: unauthenticated, read-only access to exactly one project
/// reachable via its share token. Carries no principal, grants no mutation
/// and no enumeration capability.
#[derive(Debug, Clone)]
pub struct PublicScope {
    public_id: String,
}

impl PublicScope {
    /// Build the public tier for a supplied share token. Never fails on
    /// authorization -- an unknown token surfaces later as `NotFound`.
    pub fn for_token(public_id: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
        }
    }

    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    /// The single-project predicate this scope resolves through.
    pub fn project_filter(&self) -> ProjectFilter {
        ProjectFilter::PublicId(self.public_id.clone())
    }
}
