//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_command;
mod collection_query;
mod collection_repository;
mod release_catalogue;

#[cfg(test)]
pub use collection_command::MockCollectionCommand;
pub use collection_command::{CollectionCommand, FixtureCollectionCommand, StoreVinylRequest};
#[cfg(test)]
pub use collection_query::MockCollectionQuery;
pub use collection_query::{CollectionQuery, FixtureCollectionQuery};
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{
    CollectionRepository, CollectionRepositoryError, FixtureCollectionRepository, VinylPage,
};
#[cfg(test)]
pub use release_catalogue::MockReleaseCatalogue;
pub use release_catalogue::{FixtureReleaseCatalogue, ReleaseCatalogue, ReleaseCatalogueError};
