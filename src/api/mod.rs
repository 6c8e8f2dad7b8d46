//! API module for HTTP endpoints
//!
//! Read-only query surface over the event log, result store and artifacts.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
