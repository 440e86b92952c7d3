//! Client configuration options.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::streaming::SessionCookie;
use crate::{Error, Result};

/// Default sampled-stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "https://api.twitter.com/2/tweets/sample/stream";

/// Default OAuth2 token exchange endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";

/// Configuration for the stream client.
///
/// # Example
///
/// ```
/// use tweetstream_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("consumer-key", "consumer-secret")
///     .with_connect_timeout(Duration::from_secs(5))
///     .with_user_agent("my-app/1.0");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Streaming endpoint; filter query strings are appended to it
    pub endpoint_url: String,
    /// Token exchange endpoint
    pub token_url: String,
    /// Consumer (API) key
    pub consumer_key: String,
    /// Consumer (API) secret
    pub consumer_secret: SecretString,
    /// Cookie presented by every session instead of a generated one
    pub session_cookie: Option<SessionCookie>,
    /// Bound on establishing a connection
    pub connect_timeout: Duration,
    /// Bound on the whole token exchange request
    pub exchange_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_STREAM_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            consumer_key: String::new(),
            consumer_secret: SecretString::from(String::new()),
            session_cookie: None,
            connect_timeout: Duration::from_secs(10),
            exchange_timeout: Duration::from_secs(30),
            user_agent: format!("tweetstream-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given consumer key pair.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: SecretString::from(consumer_secret.into()),
            ..Default::default()
        }
    }

    /// Set the streaming endpoint.
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = url.into();
        self
    }

    /// Set the token exchange endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Present this cookie on every session instead of generating one.
    pub fn with_session_cookie(mut self, cookie: SessionCookie) -> Self {
        self.session_cookie = Some(cookie);
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the token exchange timeout.
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that both URLs parse and the consumer key pair is present.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.endpoint_url)?;
        Url::parse(&self.token_url)?;
        self.validate_consumer_keys()
    }

    pub(crate) fn validate_consumer_keys(&self) -> Result<()> {
        if self.consumer_key.is_empty() {
            return Err(Error::Config("consumer key is empty".to_string()));
        }
        if self.consumer_secret.expose_secret().is_empty() {
            return Err(Error::Config("consumer secret is empty".to_string()));
        }
        Ok(())
    }
}
