//! Pulseboard domain types and pure domain logic.
//!
//! This crate holds everything the rest of the workspace agrees on:
//!
//! - [`project`] / [`task`] -- the two entity types and their DTOs.
//! - [`progress`] -- the completion-percentage aggregator.
//! - [`public_id`] -- opaque share-token generation.
//! - [`error`] -- the domain error taxonomy ([`CoreError`]).

pub mod error;
pub mod progress;
pub mod project;
pub mod public_id;
pub mod task;
pub mod types;

pub use error::CoreError;
