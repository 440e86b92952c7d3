//! Error types for the streaming API client.
//!
//! Every fallible operation in this crate returns [`Error`]. The variants map
//! onto the four failure classes of a stream session: credential exchange,
//! unexpected HTTP status, malformed payloads, and transport failures.

use thiserror::Error;

/// A specialized `Result` type for stream client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all stream client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Low-level transport failure (connection reset, TLS, DNS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A payload on the stream was not valid JSON for the requested record type
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Credential exchange failed, or an operation needed a token that is missing
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The endpoint answered with a status other than the expected one
    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, for debugging
        body: String,
    },

    /// A stream payload grew past the frame limit without a terminating newline
    #[error("Frame too large: {len} bytes exceeds limit of {limit}")]
    FrameTooLarge {
        /// Bytes buffered when the limit was hit
        len: usize,
        /// Configured frame limit
        limit: usize,
    },

    /// The stream body ended; no further records can be read
    #[error("Stream disconnected")]
    StreamDisconnected,

    /// Operation not permitted in the session's current state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    /// Returns `true` if a stream payload could not be decoded.
    ///
    /// Decode errors leave the session open; the caller may keep reading.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::FrameTooLarge { .. })
    }

    /// Returns `true` if the underlying connection failed or ended.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::StreamDisconnected)
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build a status error from a non-success response, consuming its body.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::HttpStatus { status, body }
    }
}
