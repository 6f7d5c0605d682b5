//! Driven port for the upstream music-metadata provider.
//!
//! Adapters classify every provider response code and report anything other
//! than success through [`ReleaseCatalogueError`]. Provider response bodies
//! never travel inside these errors.

use async_trait::async_trait;

use crate::domain::catalogue::ReleaseVersionSummary;

use super::define_port_error;

define_port_error! {
    /// Failures while looking up release data from the provider.
    pub enum ReleaseCatalogueError {
        /// The provider has no such release version.
        NotFound { version_id: u64 } =>
            "release version {version_id} not found",
        /// The provider refused to serve the request (401 or 403).
        Refused { status: u16, name: String } =>
            "provider refused the request: {status} {name}",
        /// The provider rejected the request as malformed (405 or 422).
        Rejected { status: u16, name: String } =>
            "provider rejected the request: {status} {name}",
        /// The provider failed while serving the request.
        Upstream { status: u16 } =>
            "provider failed with status {status}",
        /// The provider answered with a code outside the recognised set.
        Unrecognized { status: u16 } =>
            "provider answered with unrecognized status {status}",
        /// The request never completed.
        Transport { message: String } =>
            "provider request failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } =>
            "provider request timed out: {message}",
        /// A success response carried no body to decode (204, or an empty 200/201).
        MissingBody { status: u16 } =>
            "provider answered {status} without a release body",
        /// A success response carried an unreadable body.
        Decode { message: String } =>
            "provider response could not be decoded: {message}",
    }
}

/// Port for resolving release versions against the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseCatalogue: Send + Sync {
    /// Look up the release version `version_id`.
    async fn release_version(
        &self,
        version_id: u64,
    ) -> Result<ReleaseVersionSummary, ReleaseCatalogueError>;
}

/// Fixture catalogue that knows every version as its own release.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReleaseCatalogue;

#[async_trait]
impl ReleaseCatalogue for FixtureReleaseCatalogue {
    async fn release_version(
        &self,
        version_id: u64,
    ) -> Result<ReleaseVersionSummary, ReleaseCatalogueError> {
        Ok(ReleaseVersionSummary {
            version_id,
            release_id: version_id,
            title: format!("Release version {version_id}"),
        })
    }
}
