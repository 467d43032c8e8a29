//! Pulseboard live synchronization and aggregation layer.
//!
//! This crate is the core of the system: it keeps derived progress metrics
//! consistent across concurrent observers of the `projects` and `tasks`
//! collections, while enforcing the two access tiers over the same data.
//!
//! - [`access`] -- the tier resolver: [`OwnerScope`] (authenticated, full
//!   mutation capability) and [`PublicScope`] (anonymous, read-only,
//!   exactly one project reachable by share token).
//! - [`snapshot`] -- the emitted value types ([`ProjectProgress`],
//!   [`ProjectDetail`], [`Progress`]).
//! - [`owner_feed`] -- the subscription manager: one outer project
//!   subscription fanning out to one nested task subscription per visible
//!   project.
//! - [`public_feed`] -- the cardinality-one variant for share-token viewers.
//! - [`service`] -- mutation operations (owner tier only) and public
//!   resolution.

pub mod access;
pub mod owner_feed;
pub mod public_feed;
pub mod service;
pub mod snapshot;

pub use access::{OwnerScope, PublicScope};
pub use owner_feed::OwnerFeed;
pub use public_feed::PublicFeed;
pub use snapshot::{Progress, ProjectDetail, ProjectProgress};
