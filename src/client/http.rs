//! Stream client: configuration owner and credential cache.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use crate::auth::Credential;
use crate::streaming::StreamSession;
use crate::Result;

use super::config::ClientConfig;

/// The entry point for the streaming API.
///
/// The client owns the configuration and the HTTP connection pool, derives a
/// bearer credential exactly once, and hands out independent
/// [`StreamSession`]s. Cloning is cheap; clones share the pool and the
/// cached credential.
///
/// # Example
///
/// ```no_run
/// use tweetstream_rs::{ClientConfig, FilterSpec, StreamClient};
///
/// # async fn example() -> tweetstream_rs::Result<()> {
/// let client = StreamClient::connect(ClientConfig::new("key", "secret")).await?;
///
/// let mut session = client.stream().await?;
/// session
///     .filter(&FilterSpec::new().with_tweet_fields(["id", "text"]))
///     .await?;
///
/// let tweets: Vec<tweetstream_rs::models::Tweet> = session.next().await?;
/// println!("received {} tweets", tweets.len());
///
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct StreamClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    /// Pool used by stream sessions; no overall request timeout
    pub(crate) http: reqwest::Client,
    /// Pool used for the token exchange, bounded by `exchange_timeout`
    exchange_http: reqwest::Client,
    pub(crate) config: ClientConfig,
    credential: OnceCell<Arc<Credential>>,
}

impl StreamClient {
    /// Create a client without contacting the API.
    ///
    /// The bearer token is exchanged on the first call to
    /// [`stream`](Self::stream) or [`credential`](Self::credential).
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(config, OnceCell::new())
    }

    /// Create a client and exchange the consumer keys for a bearer token.
    ///
    /// A failed exchange aborts construction.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.credential().await?;
        Ok(client)
    }

    /// Create a client around a pre-issued credential; no exchange is made.
    pub fn with_credential(config: ClientConfig, credential: Credential) -> Result<Self> {
        Self::build(config, OnceCell::new_with(Some(Arc::new(credential))))
    }

    fn build(config: ClientConfig, credential: OnceCell<Arc<Credential>>) -> Result<Self> {
        Url::parse(&config.endpoint_url)?;
        Url::parse(&config.token_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let exchange_http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.exchange_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                exchange_http,
                config,
                credential,
            }),
        })
    }

    /// The bearer credential, exchanging the consumer keys on first use.
    ///
    /// Concurrent callers wait on a single exchange. A failed exchange is
    /// reported to every waiter and leaves nothing cached.
    pub async fn credential(&self) -> Result<Arc<Credential>> {
        self.inner.credential().await
    }

    /// Returns `true` once a credential has been derived.
    pub fn has_credential(&self) -> bool {
        self.inner.credential.initialized()
    }

    /// Create a new, unopened stream session.
    pub async fn stream(&self) -> Result<StreamSession> {
        let credential = self.credential().await?;
        debug!("Creating stream session");
        Ok(StreamSession::new(self.inner.clone(), credential))
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    async fn credential(&self) -> Result<Arc<Credential>> {
        let credential = self
            .credential
            .get_or_try_init(|| async {
                self.config.validate_consumer_keys()?;
                info!(token_url = %self.config.token_url, "Exchanging consumer keys for bearer token");
                let credential = Credential::acquire(
                    &self.exchange_http,
                    &self.config.token_url,
                    &self.config.consumer_key,
                    &self.config.consumer_secret,
                )
                .await?;
                Ok::<_, crate::Error>(Arc::new(credential))
            })
            .await?;
        Ok(credential.clone())
    }
}

impl Clone for StreamClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient")
            .field("config", &self.inner.config)
            .field("has_credential", &self.has_credential())
            .finish()
    }
}
