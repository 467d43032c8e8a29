//! WebSocket live views.
//!
//! Each connection owns exactly one feed from `pulseboard-sync`; there is
//! no shared connection registry. When the socket goes away the feed is
//! shut down, which cancels every store subscription it held.

pub mod handler;

pub use handler::{owner_ws, public_ws};
