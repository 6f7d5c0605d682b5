//! Reqwest-backed provider adapter.
//!
//! This adapter owns transport details only: request identity headers, the
//! request timeout, classification of the provider's response code and JSON
//! decoding into the domain summary. Bodies of unsuccessful responses are
//! never read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;

use super::dto::ReleaseVersionDto;
use crate::domain::catalogue::ReleaseVersionSummary;
use crate::domain::ports::{ReleaseCatalogue, ReleaseCatalogueError};
use crate::domain::status::{UNRECOGNIZED_STATUS, classify};

const DEFAULT_USER_AGENT: &str = "CrateDig/0.2 +https://cratedig.kevindamm.com";
const DEFAULT_ACCEPT: &str = "application/vnd.discogs.v2.html+json";

/// Identity headers sent with every provider request.
pub struct DiscogsHttpIdentity {
    /// HTTP user-agent identifying the application.
    pub user_agent: String,
    /// Media type requested from the provider.
    pub accept: String,
}

impl Default for DiscogsHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept: DEFAULT_ACCEPT.to_owned(),
        }
    }
}

/// Provider adapter that performs HTTP GET requests against one base URL.
pub struct DiscogsHttpSource {
    client: Client,
    base_url: Url,
    user_agent: String,
    accept: String,
}

impl DiscogsHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, DiscogsHttpIdentity::default())
    }

    /// Build an adapter with explicit identity headers.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: DiscogsHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            user_agent: identity.user_agent,
            accept: identity.accept,
        })
    }
}

#[async_trait]
impl ReleaseCatalogue for DiscogsHttpSource {
    async fn release_version(
        &self,
        version_id: u64,
    ) -> Result<ReleaseVersionSummary, ReleaseCatalogueError> {
        let url = release_url(&self.base_url, version_id)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, self.accept.as_str())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        check_status(status, version_id)?;

        let body = response.bytes().await.map_err(map_transport_error)?;
        decode_success(status, body.as_ref(), version_id)
    }
}

fn release_url(base_url: &Url, version_id: u64) -> Result<Url, ReleaseCatalogueError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| ReleaseCatalogueError::transport(format!("base URL {base_url} cannot hold a path")))?
        .pop_if_empty()
        .push("releases")
        .push(&version_id.to_string());
    Ok(url)
}

/// Classify the provider's response code, passing recognised successes that
/// can carry a body.
///
/// Codes outside the recognised set fail even inside the `2xx` band, so
/// every accepted response has a documented meaning. `204 No Content` is
/// recognised but never holds a release, so it fails without a read.
fn check_status(status: StatusCode, version_id: u64) -> Result<(), ReleaseCatalogueError> {
    let code = status.as_u16();
    let Some(descriptor) = classify(code) else {
        warn!(status = code, name = UNRECOGNIZED_STATUS, version_id, "provider lookup failed");
        return Err(ReleaseCatalogueError::unrecognized(code));
    };
    if status == StatusCode::NO_CONTENT {
        warn!(status = code, name = descriptor.name(), version_id, "provider success carried no body");
        return Err(ReleaseCatalogueError::missing_body(code));
    }
    if descriptor.is_success() {
        return Ok(());
    }

    warn!(status = code, name = descriptor.name(), version_id, "provider lookup failed");
    Err(match code {
        404 => ReleaseCatalogueError::not_found(version_id),
        401 | 403 => ReleaseCatalogueError::refused(code, descriptor.name()),
        405 | 422 => ReleaseCatalogueError::rejected(code, descriptor.name()),
        _ => ReleaseCatalogueError::upstream(code),
    })
}

fn decode_success(
    status: StatusCode,
    body: &[u8],
    version_id: u64,
) -> Result<ReleaseVersionSummary, ReleaseCatalogueError> {
    if body.is_empty() {
        warn!(status = status.as_u16(), version_id, "provider success carried no body");
        return Err(ReleaseCatalogueError::missing_body(status.as_u16()));
    }
    parse_release_version(body, version_id)
}

fn parse_release_version(
    body: &[u8],
    version_id: u64,
) -> Result<ReleaseVersionSummary, ReleaseCatalogueError> {
    let decoded: ReleaseVersionDto = serde_json::from_slice(body).map_err(|error| {
        ReleaseCatalogueError::decode(format!("invalid release payload: {error}"))
    })?;
    decoded
        .into_summary(version_id)
        .map_err(ReleaseCatalogueError::decode)
}

fn map_transport_error(error: reqwest::Error) -> ReleaseCatalogueError {
    if error.is_timeout() {
        ReleaseCatalogueError::timeout(error.to_string())
    } else {
        ReleaseCatalogueError::transport(error.to_string())
    }
}
