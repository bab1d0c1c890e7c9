//! Lapak Storefront library.
//!
//! The storefront server as a library, so the router can be driven from
//! integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
