//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CollectionCommand, CollectionQuery, FixtureCollectionCommand, FixtureCollectionQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub collection: Arc<dyn CollectionCommand>,
    pub collection_query: Arc<dyn CollectionQuery>,
}

impl HttpState {
    /// Construct state from the collection ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cratedig::domain::ports::{FixtureCollectionCommand, FixtureCollectionQuery};
    /// use cratedig::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureCollectionCommand),
    ///     Arc::new(FixtureCollectionQuery),
    /// );
    /// let _query = state.collection_query.clone();
    /// ```
    pub fn new(
        collection: Arc<dyn CollectionCommand>,
        collection_query: Arc<dyn CollectionQuery>,
    ) -> Self {
        Self {
            collection,
            collection_query,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureCollectionCommand),
            Arc::new(FixtureCollectionQuery),
        )
    }
}
