//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **discogs**: reqwest client for the music-metadata provider
//! - **persistence**: collection store adapters
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod discogs;
pub mod persistence;
