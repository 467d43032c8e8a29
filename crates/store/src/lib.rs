//! Entity store adapter for the `projects` and `tasks` collections.
//!
//! The document store itself is an external collaborator; this crate pins
//! down the contract the rest of the workspace consumes:
//!
//! - [`EntityStore`] -- query / subscribe / create / update / delete over
//!   the two collections, behind an object-safe async trait.
//! - [`ProjectFilter`] / [`TaskFilter`] -- typed filter predicates.
//! - [`Subscription`] / [`SubscriptionHandle`] -- full-snapshot change
//!   subscriptions with idempotent teardown.
//! - [`MemoryStore`] -- the in-process reference implementation.

pub mod filter;
pub mod memory;
pub mod store;
pub mod subscription;

pub use filter::{ProjectFilter, TaskFilter};
pub use memory::MemoryStore;
pub use store::{DynStore, EntityStore, StoreError};
pub use subscription::{Subscription, SubscriptionHandle};
