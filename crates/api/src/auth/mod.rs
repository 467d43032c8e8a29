//! Authentication primitives.
//!
//! The identity provider itself is external; what lives here is the access
//! token boundary: HS256 JWT validation whose subject claim is the owner
//! identifier the rest of the system consumes.

pub mod jwt;
