//! Stream session lifecycle.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::auth::Credential;
use crate::client::ClientInner;
use crate::models::Tweet;
use crate::{Error, Result};

use super::cookie::SessionCookie;
use super::decoder::RecordDecoder;
use super::filter::FilterSpec;

/// Lifecycle state of a [`StreamSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created; no stream has been opened yet
    Unopened,
    /// A filtered stream is open and can be read
    Open,
    /// Terminal; every further operation fails
    Closed,
}

impl SessionState {
    /// Returns `true` for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Unopened => "unopened",
            SessionState::Open => "open",
            SessionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Request settings shared by every call of one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    endpoint_url: String,
    authorization: SecretString,
    session_cookie: Option<SessionCookie>,
}

impl SessionConfig {
    /// Streaming endpoint, without filter parameters.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// `Authorization` header value, `Bearer <token>`.
    pub fn authorization_header_value(&self) -> &SecretString {
        &self.authorization
    }

    /// Cookie presented on every request, once assigned.
    pub fn session_cookie(&self) -> Option<&SessionCookie> {
        self.session_cookie.as_ref()
    }
}

/// One authenticated connection to the streaming endpoint.
///
/// A session moves from [`Unopened`](SessionState::Unopened) to
/// [`Open`](SessionState::Open) through [`filter`](Self::filter) and ends in
/// [`Closed`](SessionState::Closed) through [`close`](Self::close). The
/// session cookie is assigned at most once and then presented identically on
/// every request.
///
/// Sessions are obtained from [`StreamClient::stream`](crate::StreamClient::stream).
///
/// # Example
///
/// ```no_run
/// use tweetstream_rs::{FilterSpec, StreamClient};
/// use tweetstream_rs::models::Tweet;
///
/// # async fn example(client: StreamClient) -> tweetstream_rs::Result<()> {
/// let mut session = client.stream().await?;
/// session.filter(&FilterSpec::new().with_expansions(["author_id"])).await?;
///
/// loop {
///     match session.next::<Tweet>().await {
///         Ok(tweets) => {
///             for tweet in tweets {
///                 println!("{}: {}", tweet.id, tweet.text);
///             }
///         }
///         Err(e) if e.is_decode_error() => continue,
///         Err(e) => {
///             eprintln!("stream ended: {e}");
///             break;
///         }
///     }
/// }
///
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct StreamSession {
    inner: Arc<ClientInner>,
    credential: Arc<Credential>,
    config: SessionConfig,
    state: SessionState,
    decoder: Option<RecordDecoder>,
}

impl StreamSession {
    pub(crate) fn new(inner: Arc<ClientInner>, credential: Arc<Credential>) -> Self {
        let config = SessionConfig {
            endpoint_url: inner.config.endpoint_url.clone(),
            authorization: SecretString::from(format!(
                "Bearer {}",
                credential.access_token().expose_secret()
            )),
            session_cookie: inner.config.session_cookie.clone(),
        };

        Self {
            inner,
            credential,
            config,
            state: SessionState::Unopened,
            decoder: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` while a filtered stream is open.
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Returns `true` while the session holds a live connection.
    pub fn has_handle(&self) -> bool {
        self.decoder.is_some()
    }

    /// The session cookie, once assigned.
    pub fn cookie(&self) -> Option<&SessionCookie> {
        self.config.session_cookie.as_ref()
    }

    /// Request settings of this session.
    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open the stream with server-side filter parameters.
    ///
    /// Moves the session from `Unopened` to `Open`. If the session has no
    /// cookie yet, a `personalization_id` cookie is generated here and kept
    /// for the rest of the session. Only the response status is checked;
    /// the body is left for [`next`](Self::next) to read incrementally.
    ///
    /// Calling this while `Open` replaces the current connection. The old
    /// connection is released before the new request is sent, so if the
    /// reopen fails the session falls back to `Unopened` with no connection;
    /// the cookie is kept and `filter` may be called again.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if the session is closed
    /// - [`Error::Authentication`] if the bearer token is empty; no request is sent
    /// - [`Error::HttpStatus`] if the endpoint does not answer 200
    /// - [`Error::Http`] on transport failure
    #[instrument(skip(self, filter), fields(state = %self.state))]
    pub async fn filter(&mut self, filter: &FilterSpec) -> Result<()> {
        self.ensure_not_closed("filter")?;
        self.ensure_token()?;
        self.assign_cookie();

        if self.decoder.take().is_some() {
            debug!("Releasing previous stream connection");
        }
        self.state = SessionState::Unopened;

        let url = filter.apply_to(&self.config.endpoint_url);
        info!(url = %url, "Opening stream");

        let response = self.request(Method::GET, &url).send().await?;
        if response.status() != StatusCode::OK {
            warn!(status = response.status().as_u16(), "Stream open rejected");
            return Err(Error::from_response(response).await);
        }

        self.decoder = Some(RecordDecoder::from_response(response));
        self.state = SessionState::Open;
        Ok(())
    }

    /// Read the whole unfiltered endpoint body in one shot.
    ///
    /// This buffers the complete response and is meant for one-off sampling
    /// only; it does not open the session and cannot be combined with
    /// [`next`](Self::next).
    #[instrument(skip(self), fields(state = %self.state))]
    pub async fn sample(&mut self) -> Result<Bytes> {
        self.ensure_not_closed("sample")?;
        self.ensure_token()?;
        self.assign_cookie();

        debug!(url = %self.config.endpoint_url, "Sampling stream");
        let response = self
            .request(Method::GET, &self.config.endpoint_url)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(Error::from_response(response).await);
        }

        Ok(response.bytes().await?)
    }

    /// Run one decode cycle against the open stream.
    ///
    /// Returns the records that became available, possibly none. Decode
    /// errors leave the stream open; the end of the body is reported as
    /// [`Error::StreamDisconnected`].
    pub async fn next<R: DeserializeOwned>(&mut self) -> Result<Vec<R>> {
        self.decoder_mut()?.next().await
    }

    /// [`next`](Self::next) decoding the default [`Tweet`] record.
    pub async fn next_tweets(&mut self) -> Result<Vec<Tweet>> {
        self.next().await
    }

    /// Lazy sequence of records from the open stream.
    ///
    /// See [`RecordDecoder::records`].
    pub fn records<'a, R>(&'a mut self) -> Result<BoxStream<'a, Result<R>>>
    where
        R: DeserializeOwned + Send + 'a,
    {
        Ok(self.decoder_mut()?.records())
    }

    /// Terminate the session.
    ///
    /// The local connection is released before the server is contacted, so
    /// it is released on every path. A `DELETE` carrying the session's
    /// Authorization and Cookie headers then tells the server the session
    /// ended. The session is `Closed` afterwards even if that request fails.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if the session was already closed
    /// - [`Error::HttpStatus`] if the endpoint does not answer 200
    /// - [`Error::Http`] on transport failure
    #[instrument(skip(self), fields(state = %self.state))]
    pub async fn close(&mut self) -> Result<()> {
        self.ensure_not_closed("close")?;

        self.decoder = None;
        self.state = SessionState::Closed;
        debug!("Stream connection released");

        self.ensure_token()?;
        let response = self
            .request(Method::DELETE, &self.config.endpoint_url)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            warn!(status = response.status().as_u16(), "Stream close rejected");
            return Err(Error::from_response(response).await);
        }

        info!("Stream session closed");
        Ok(())
    }

    fn ensure_not_closed(&self, operation: &str) -> Result<()> {
        if self.state.is_terminal() {
            return Err(Error::InvalidState(format!(
                "cannot {operation}: session is closed"
            )));
        }
        Ok(())
    }

    fn ensure_token(&self) -> Result<()> {
        if self.credential.is_empty() {
            return Err(Error::Authentication("bearer token is empty".to_string()));
        }
        Ok(())
    }

    fn assign_cookie(&mut self) {
        if self.config.session_cookie.is_none() {
            let cookie = SessionCookie::generate();
            debug!(cookie = %cookie.name(), "Assigned session cookie");
            self.config.session_cookie = Some(cookie);
        }
    }

    fn decoder_mut(&mut self) -> Result<&mut RecordDecoder> {
        match self.state {
            SessionState::Open => {}
            SessionState::Unopened => {
                return Err(Error::InvalidState(
                    "stream not opened; call filter() first".to_string(),
                ))
            }
            SessionState::Closed => {
                return Err(Error::InvalidState("session is closed".to_string()))
            }
        }
        self.decoder
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no open stream connection".to_string()))
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .inner
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.config.authorization.expose_secret());

        match &self.config.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie.header_value()),
            None => builder,
        }
    }
}

impl fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("endpoint_url", &self.config.endpoint_url)
            .field("state", &self.state)
            .field("cookie", &self.config.session_cookie)
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            debug!("Stream session dropped while open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfig, StreamClient};

    fn session_with_token(token: &str) -> StreamSession {
        let client = StreamClient::with_credential(
            ClientConfig::default().with_endpoint_url("http://127.0.0.1:9/stream"),
            Credential::bearer(token),
        )
        .unwrap();
        let credential = Arc::new(Credential::bearer(token));
        StreamSession::new(client.inner.clone(), credential)
    }

    #[test]
    fn test_new_session_is_unopened() {
        let session = session_with_token("abc");
        assert_eq!(session.state(), SessionState::Unopened);
        assert!(session.cookie().is_none());
        assert!(!session.has_handle());
        assert_eq!(
            session
                .session_config()
                .authorization_header_value()
                .expose_secret(),
            "Bearer abc"
        );
    }

    #[tokio::test]
    async fn test_empty_token_fails_before_request() {
        let mut session = session_with_token("");

        let err = session.filter(&FilterSpec::new()).await.unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(session.state(), SessionState::Unopened);
        // cookie assignment happens after the token check
        assert!(session.cookie().is_none());
    }

    #[tokio::test]
    async fn test_next_requires_open_session() {
        let mut session = session_with_token("abc");
        let err = session.next::<serde_json::Value>().await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_cookie_is_assigned_once() {
        let mut session = session_with_token("abc");
        session.assign_cookie();
        let first = session.cookie().cloned().unwrap();
        session.assign_cookie();
        assert_eq!(session.cookie(), Some(&first));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Open.to_string(), "open");
        assert!(SessionState::Closed.is_terminal());
        assert!(!SessionState::Unopened.is_terminal());
    }
}
