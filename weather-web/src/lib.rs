//! Web layer for the city weather application.
//!
//! This crate focuses on:
//! - Routing and request handlers
//! - Syntactic input validation in front of the handlers
//! - Per-client rate limiting
//! - Funneling every failure into a single rendered response

pub mod extract;
pub mod rate_limit;
pub mod respond;
pub mod routes;
pub mod state;
pub mod views;

pub use routes::app;
pub use state::AppState;
