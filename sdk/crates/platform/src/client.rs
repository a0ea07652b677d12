//! HTTP client utilities
//!
//! Construction of the shared `reqwest` client and URL helpers for
//! deriving endpoints relative to a server-issued URL.

use std::time::Duration;

use url::Url;

/// Settings for the outbound HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total request timeout
    pub timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("threeds-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Build a rustls-backed `reqwest::Client` from the given settings
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}

/// Error when deriving a URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),
}

/// Derive a sibling endpoint of `url`
///
/// Drops query and fragment, removes the last path segment, then appends
/// `segment`. A `/`-separated `segment` is appended as several path
/// segments; empty parts are skipped.
///
/// ## Examples
/// ```rust
/// use platform::client::sibling_endpoint;
/// use url::Url;
///
/// let authorize = Url::parse("https://api.example.com/payments/pay_1/authorize?x=1").unwrap();
/// let config = sibling_endpoint(&authorize, "config").unwrap();
/// assert_eq!(config.as_str(), "https://api.example.com/payments/pay_1/config");
/// ```
pub fn sibling_endpoint(url: &Url, segment: &str) -> Result<Url, UrlError> {
    let mut derived = url.clone();
    derived.set_query(None);
    derived.set_fragment(None);

    {
        let mut segments = derived
            .path_segments_mut()
            .map_err(|_| UrlError::CannotBeABase(url.to_string()))?;
        segments
            .pop_if_empty()
            .pop()
            .extend(segment.split('/').filter(|part| !part.is_empty()));
    }

    Ok(derived)
}
