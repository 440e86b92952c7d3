//! Application-only bearer credential.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{Error, Result};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";
const GRANT_BODY: &str = "grant_type=client_credentials";

/// Bearer credential obtained through the OAuth2 client-credentials grant.
///
/// A credential is immutable once created. The client derives one per
/// lifetime and shares it between all stream sessions; it is never refreshed.
#[derive(Clone)]
pub struct Credential {
    token_type: String,
    access_token: SecretString,
}

impl Credential {
    /// Create a credential from an already known token.
    pub fn new(token_type: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Create a `Bearer` credential from a pre-issued app token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new("Bearer", access_token)
    }

    /// Exchange a consumer key/secret pair for a bearer token.
    ///
    /// Sends exactly one `POST` to `token_url`. There is no retry: any
    /// non-200 status or an unreadable body is an [`Error::Authentication`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use secrecy::SecretString;
    /// use tweetstream_rs::auth::Credential;
    ///
    /// # async fn example() -> tweetstream_rs::Result<()> {
    /// let http = reqwest::Client::new();
    /// let credential = Credential::acquire(
    ///     &http,
    ///     "https://api.twitter.com/oauth2/token",
    ///     "consumer-key",
    ///     &SecretString::from("consumer-secret"),
    /// ).await?;
    /// println!("token type: {}", credential.token_type());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(http, consumer_secret))]
    pub async fn acquire(
        http: &reqwest::Client,
        token_url: &str,
        consumer_key: &str,
        consumer_secret: &SecretString,
    ) -> Result<Self> {
        debug!("Requesting application bearer token");

        let response = http
            .post(token_url)
            .header(
                AUTHORIZATION,
                basic_authorization(consumer_key, consumer_secret.expose_secret()),
            )
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(GRANT_BODY)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Token exchange rejected");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "Token exchange failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            Error::Authentication(format!("Malformed token response: {e}"))
        })?;

        if token.access_token.is_empty() {
            return Err(Error::Authentication(
                "Token response carried an empty access token".to_string(),
            ));
        }

        debug!(token_type = %token.token_type, "Bearer token acquired");
        Ok(Self::new(token.token_type, token.access_token))
    }

    /// The token type reported by the exchange (usually `bearer`).
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// The raw access token.
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// Returns `true` if no access token is present.
    pub fn is_empty(&self) -> bool {
        self.access_token.expose_secret().is_empty()
    }

    /// The presentable form `"<token_type> <access_token>"`.
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.expose_secret())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token_type", &self.token_type)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// `Basic base64(escape(key) ":" escape(secret))`
fn basic_authorization(consumer_key: &str, consumer_secret: &str) -> String {
    let pair = format!(
        "{}:{}",
        form_escape(consumer_key),
        form_escape(consumer_secret)
    );
    format!("Basic {}", BASE64.encode(pair))
}

fn form_escape(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
}
