//! Music-metadata provider adapters.
//!
//! This module provides a reqwest implementation of the `ReleaseCatalogue`
//! port.

mod dto;
mod http_source;

pub use http_source::{DiscogsHttpIdentity, DiscogsHttpSource};
