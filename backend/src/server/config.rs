//! Server settings loaded via OrthoConfig.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.discogs.com";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Listener and provider settings read from the CLI, `CRATEDIG_*`
/// environment variables and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CRATEDIG")]
pub struct AppSettings {
    /// Address the HTTP listener binds to.
    pub host: Option<IpAddr>,
    /// Port the HTTP listener binds to.
    pub port: Option<u16>,
    /// Base URL of the music metadata provider.
    pub provider_base_url: Option<String>,
    /// Upper bound on a single provider request, in seconds.
    pub provider_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Socket address for the listener, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Provider base URL, falling back to the public Discogs API.
    ///
    /// # Errors
    /// Returns [`url::ParseError`] when the configured value is not a URL.
    pub fn provider_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.provider_base_url
                .as_deref()
                .unwrap_or(DEFAULT_PROVIDER_BASE_URL),
        )
    }

    /// Provider request timeout.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider_timeout_secs
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
        )
    }
}
