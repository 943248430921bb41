//! The HTTP seam between the client and the gateway.

use http::{
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde_json::Value;
use url::Url;

use crate::{
    config::{Config, redact},
    errors::Result,
};

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const RUST_VERSION_HEADER: &str = "x-rust-version";
const RUST_PLATFORM_HEADER: &str = "x-rust-platform";

/// A single request to the gateway, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// JSON body, `None` for GET and DELETE.
    pub body: Option<Value>,
}

/// The raw gateway answer, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Sends one request and returns the raw response.
///
/// Implementations must not retry. Any status code, success or not, is a
/// successful send; only failing to get a response at all is an error.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Blocking `reqwest` transport with basic auth and the fixed headers.
#[derive(Clone)]
pub struct HttpTransport {
    pub client: reqwest::blocking::Client,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .connect_timeout(config.timeouts.connect)
            .timeout(config.timeouts.total())
            .build()?;

        Ok(HttpTransport {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .basic_auth(&self.api_key, Some(&self.api_secret));

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status();
        let body = response.bytes()?.to_vec();

        Ok(RawResponse { status, body })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(RUST_VERSION_HEADER),
        HeaderValue::from_static(env!("CARGO_PKG_RUST_VERSION")),
    );
    // Diagnostic only; skipped if the platform string is not a valid header value.
    if let Ok(platform) = HeaderValue::from_str(&format!(
        "{}-{}",
        std::env::consts::ARCH,
        std::env::consts::OS
    )) {
        headers.insert(HeaderName::from_static(RUST_PLATFORM_HEADER), platform);
    }
    headers
}
