//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers validate route parameters, query strings and bodies through the
//! schema registry before touching a port, and validate every payload
//! against its response schema before it leaves the process.

pub mod crates;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod status;
pub mod validation;
pub mod vinyl;

pub use error::ApiResult;
