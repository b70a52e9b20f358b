//! Shared application state
//!
//! Everything a request handler needs, cloned cheaply into each handler.

pub mod context;

pub use context::AppState;
