//! Application-only authentication for the streaming API.
//!
//! The stream endpoints accept an app-level bearer token obtained through the
//! OAuth2 client-credentials grant: the consumer key and secret are sent as a
//! Basic authorization header and exchanged for a token that is then
//! presented as `Authorization: Bearer <token>` on every stream request.
//!
//! ```no_run
//! use secrecy::SecretString;
//! use tweetstream_rs::auth::Credential;
//!
//! # async fn example() -> tweetstream_rs::Result<()> {
//! let credential = Credential::acquire(
//!     &reqwest::Client::new(),
//!     "https://api.twitter.com/oauth2/token",
//!     "consumer-key",
//!     &SecretString::from("consumer-secret"),
//! ).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Most callers never touch this module directly: [`StreamClient`](crate::StreamClient)
//! performs the exchange once and caches the result.

mod credential;

pub use credential::Credential;
