//! Storage adapters for the collection store port.
//!
//! The hosting environment owns the real table binding; this module carries
//! the in-memory stand-in used by the server binary and the tests.

mod in_memory_collection_repository;

pub use in_memory_collection_repository::InMemoryCollectionRepository;
