//! Request-level middleware: authentication extraction.

pub mod auth;
